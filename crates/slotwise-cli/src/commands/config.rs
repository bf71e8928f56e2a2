use clap::Subcommand;
use slotwise_core::EngineConfig;

use crate::common::CliResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show effective configuration
    Show,
    /// Write the default configuration file
    Init,
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Show => {
            let config = EngineConfig::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Init => {
            let config = EngineConfig::default();
            config.save()?;
            println!("configuration initialized");
        }
    }
    Ok(())
}
