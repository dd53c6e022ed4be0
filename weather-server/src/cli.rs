use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use weather_core::Config;

use crate::{logging, logging::LogFormat, server};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cep-weather", version, about = "Current temperature for a Brazilian CEP")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP service.
    Serve {
        /// Config file; defaults to the platform config directory.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to bind. Overrides PORT and the config file.
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind.
        #[arg(long)]
        host: Option<String>,

        /// Success page template.
        #[arg(long)]
        template: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t)]
        log_format: LogFormat,
    },

    /// Store the WeatherAPI.com key in the config file.
    Configure {
        /// Config file to update; defaults to the platform config directory.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { config, port, host, template, log_format } => {
                logging::init(log_format)?;

                let mut cfg = Config::load(config.as_deref())?;
                if let Some(port) = port {
                    cfg.port = port;
                }
                if let Some(host) = host {
                    cfg.host = host;
                }
                if let Some(template) = template {
                    cfg.template_path = template;
                }

                server::serve(&cfg).await
            }
            Command::Configure { config } => configure(config),
        }
    }
}

fn configure(path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = match path {
        Some(path) => path,
        None => Config::config_file_path()?,
    };

    let mut cfg = if path.exists() { Config::load_from(&path)? } else { Config::default() };

    let key = inquire::Password::new("WeatherAPI.com key:")
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_validator(inquire::required!("the key cannot be empty"))
        .prompt()
        .context("Failed to read the API key")?;

    cfg.weather.api_key = Some(key.trim().to_string());
    cfg.save(&path)?;

    println!("Saved WeatherAPI key to {}", path.display());
    Ok(())
}
