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

use clap::Parser;
use log::{info, LevelFilter};
use ome_report::{
    render_system_table, AppConfig, ConfigurationProvider, ContainerConfigBuilder, DomainError,
    ServiceContainer, TomlConfigurationProvider, DEFAULT_CONFIG_FILE,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "ome_report", version)]
#[command(about = "Inventory listings and warranty exports from OpenManage Enterprise")]
struct Opt {
    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Export warranty information instead of listing systems
    #[arg(long)]
    warranty: bool,

    /// Expand logging with debug level messages
    #[arg(long)]
    debug: bool,

    /// Read the API response from a saved JSON file
    #[arg(long)]
    input: Option<PathBuf>,

    /// Write the warranty export here instead of output.filename
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print fully-qualified host names
    #[arg(long)]
    fqdn: bool,

    /// Print a default configuration file and exit
    #[arg(long)]
    print_default_config: bool,
}

fn init_logging(level: LevelFilter, debug: bool) {
    let level = if debug {
        level.max(LevelFilter::Debug)
    } else {
        level
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

async fn run(opt: &Opt, app_config: AppConfig) -> Result<(), DomainError> {
    let container_config = ContainerConfigBuilder::new()
        .input(opt.input.clone())
        .output(opt.output.clone())
        .force_fqdn(opt.fqdn)
        .build();
    let container = ServiceContainer::new(app_config, container_config);

    if opt.warranty {
        let service = container.create_warranty_service()?;
        let path = container.warranty_output_path();
        let outcome = service.export_warranty(&path).await?;
        info!(
            "Exported {} of {} warranty items",
            outcome.records.len(),
            outcome.total()
        );
    } else {
        let service = container.create_inventory_service()?;
        let outcome = service.collect_inventory().await?;
        let stdout = std::io::stdout();
        render_system_table(&outcome.records, &mut stdout.lock())?;
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let opt = Opt::parse();

    if opt.print_default_config {
        return match TomlConfigurationProvider::example_toml() {
            Ok(text) => {
                print!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let provider = TomlConfigurationProvider::new(&opt.config);
    let app_config = match provider.load_config().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Unable to parse config file: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(
        app_config.logging.level_filter().unwrap_or(LevelFilter::Info),
        opt.debug,
    );

    match run(&opt, app_config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
