use std::path::PathBuf;

use clap::Parser;
use engine_logging::LogLevel;

use crate::config::AppConfig;

/// Identify the dog breed in each picture and list matching catalog images.
#[derive(Debug, Parser)]
#[command(name = "breedscope", version, about)]
pub struct Cli {
    /// Pictures to identify, processed in order.
    #[arg(required = true, value_name = "IMAGE")]
    pub images: Vec<PathBuf>,

    /// RON config file; defaults to ./breedscope.ron when present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the breed catalog API root.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Override the vision classifier endpoint.
    #[arg(long, value_name = "URL")]
    pub classifier_url: Option<String>,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Command line flags win over the config file.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.base_url {
            config.fetch.base_url = url.clone();
        }
        if let Some(url) = &self.classifier_url {
            config.fetch.classifier_url = url.clone();
        }
        if self.verbose {
            config.log_level = LogLevel::Debug;
        }
    }
}
