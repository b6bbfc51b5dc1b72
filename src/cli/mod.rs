//! Command-line interface for treeload.
//!
//! Loads content and prints it as JSON, or shows the resolved configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::{self, Config};
use crate::core::ContentLoader;

/// treeload - load a content tree into typed collections
#[derive(Parser, Debug)]
#[command(name = "treeload")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Overrides applied on top of the config file and environment
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Config file (defaults to treeload.yaml in this or a parent directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Local content directory
    #[arg(long, global = true)]
    pub local: Option<PathBuf>,

    /// Zip archive URL
    #[arg(long, global = true)]
    pub zip_url: Option<String>,

    /// GitHub branch URL (https://github.com/<org>/<repo>/archive/<branch>)
    #[arg(long, global = true)]
    pub github_branch_url: Option<String>,

    /// Base URL for image assets
    #[arg(long, global = true)]
    pub asset_base_url: Option<String>,

    /// Staging directory (emptied on every run)
    #[arg(long, global = true)]
    pub staging_dir: Option<PathBuf>,

    /// Disable the "still working" notice
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl SourceArgs {
    /// Apply flags over a loaded configuration
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(ref path) = self.local {
            config.local_path = Some(path.clone());
        }
        if let Some(ref url) = self.zip_url {
            config.zip_url = Some(url.clone());
        }
        if let Some(ref url) = self.github_branch_url {
            config.github_branch_url = Some(url.clone());
        }
        if let Some(ref url) = self.asset_base_url {
            config.asset_base_url = Some(url.clone());
        }
        if let Some(ref dir) = self.staging_dir {
            config.staging_dir = dir.clone();
        }
        if self.quiet {
            config.verbose_ms = None;
        }
        config
    }

    /// Load the configuration and apply flags
    pub fn resolve(&self) -> Result<Config> {
        let loaded = config::load(self.config.as_deref())?;
        Ok(self.apply(loaded))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load content and print it as JSON (default)
    Load {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show resolved configuration
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let config = self.source.resolve()?;

        match self.command.unwrap_or(Commands::Load {
            output: None,
            compact: false,
        }) {
            Commands::Load { output, compact } => load_content(config, output, compact).await,
            Commands::Config => show_config(&config),
        }
    }
}

/// Run a load and write the result
async fn load_content(config: Config, output: Option<PathBuf>, compact: bool) -> Result<()> {
    let content = ContentLoader::new(config)
        .get_data()
        .await
        .context("Failed to load content")?;

    let json = if compact {
        serde_json::to_string(&content)?
    } else {
        serde_json::to_string_pretty(&content)?
    };

    match output {
        Some(path) => tokio::fs::write(&path, json + "\n")
            .await
            .with_context(|| format!("Failed to write output: {}", path.display()))?,
        None => println!("{}", json),
    }

    Ok(())
}

/// Print the resolved configuration
fn show_config(config: &Config) -> Result<()> {
    fn show<T: std::fmt::Display>(value: Option<T>) -> String {
        value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    }

    println!("treeload configuration");
    println!();
    println!("Sources:");
    println!("  Local path:        {}", show(config.local_path.as_ref().map(|p| p.display())));
    println!("  Zip URL:           {}", show(config.zip_url.as_ref()));
    println!("  GitHub branch URL: {}", show(config.github_branch_url.as_ref()));
    println!("  Asset base URL:    {}", show(config.asset_base_url.as_ref()));
    println!();
    println!("Staging directory:   {}", config.staging_dir.display());
    println!(
        "Progress notice:     {}",
        config
            .verbose_ms
            .map(|ms| format!("after {}ms", ms))
            .unwrap_or_else(|| "disabled".to_string())
    );

    Ok(())
}
