/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Host name normalization

use std::net::IpAddr;

/// Normalize a host name for display
///
/// The value is lower-cased first. Literal IPv4/IPv6 addresses are returned
/// as-is. Otherwise the leading label is returned unless `keep_fqdn` is set.
pub fn normalize_hostname(raw: &str, keep_fqdn: bool) -> String {
    let lowered = raw.to_lowercase();
    if keep_fqdn || lowered.parse::<IpAddr>().is_ok() {
        return lowered;
    }
    match lowered.split_once('.') {
        Some((short, _)) => short.to_string(),
        None => lowered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name() {
        assert_eq!(normalize_hostname("host1.example.com", false), "host1");
        assert_eq!(normalize_hostname("HOST1.Example.COM", false), "host1");
        assert_eq!(normalize_hostname("standalone", false), "standalone");
        assert_eq!(normalize_hostname("", false), "");
    }

    #[test]
    fn test_fqdn_kept() {
        assert_eq!(
            normalize_hostname("Host1.Example.com", true),
            "host1.example.com"
        );
        assert_eq!(normalize_hostname("standalone", true), "standalone");
    }

    #[test]
    fn test_addresses_untouched() {
        for addr in ["10.1.2.3", "192.168.0.254", "::1", "fe80::1:2", "2001:db8::8a2e:370:7334"] {
            assert_eq!(normalize_hostname(addr, false), addr);
            assert_eq!(normalize_hostname(addr, true), addr);
        }
    }

    #[test]
    fn test_idempotent() {
        for raw in ["a.b.c", "A.B", "plain", "10.0.0.1", ".leading", "trailing.", "x..y"] {
            let once = normalize_hostname(raw, false);
            assert_eq!(normalize_hostname(&once, false), once);
        }
    }

    #[test]
    fn test_not_quite_an_address() {
        // Five octets is not an IPv4 literal
        assert_eq!(normalize_hostname("10.1.2.3.4", false), "10");
        assert_eq!(normalize_hostname("db-01.rack2.dc", false), "db-01");
    }
}
