//! Command-line interface for Landing Zone Forge.
//!
//! Two commands cover the collaborator surface the core exposes:
//!
//! ```bash
//! # Compile a configuration document into a directory of Terraform files
//! lzforge compile config.json -o ./out
//!
//! # Validate a document and list failing forms
//! lzforge validate config.json
//! ```
//!
//! `compile` heals the document through one store update pass before
//! assembling files, exactly as the browser UI does after every edit.

use crate::config::Config;
use crate::core::ForgeError;
use crate::state::Store;
use crate::tf::{FileContent, config_to_files};
use crate::validate::invalid_forms;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Deterministic Terraform generation for IBM Cloud landing zones.
#[derive(Parser)]
#[command(name = "lzforge", version, about)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a configuration document into Terraform files
    Compile {
        /// Path to the configuration document (JSON)
        config: PathBuf,
        /// Output directory for the generated files
        #[arg(short, long, default_value = "./landing-zone")]
        output: PathBuf,
        /// Print the generated file names without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration document and list failing forms
    Validate {
        /// Path to the configuration document (JSON)
        config: PathBuf,
    },
    /// Write the seeded starter configuration to a file
    Init {
        /// Destination path for the starter document
        #[arg(default_value = "lzforge.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Execute the parsed command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Compile {
                config,
                output,
                dry_run,
            } => compile(&config, &output, dry_run),
            Commands::Validate { config } => validate(&config),
            Commands::Init { config } => init(&config),
        }
    }
}

fn compile(config_path: &Path, output: &Path, dry_run: bool) -> Result<()> {
    let document = Config::load(config_path)?;
    // One update pass heals imported documents the same way the UI does.
    let store = Store::from_config(document);
    let files = config_to_files(store.config())?;
    for (name, content) in files.iter() {
        match content {
            FileContent::Text(text) => {
                if dry_run {
                    println!("{name}");
                } else {
                    write_file(&output.join(name), text)?;
                }
            }
            FileContent::Module(module_files) => {
                for (file, text) in module_files {
                    let path = output.join(name).join(file);
                    if dry_run {
                        println!("{name}/{file}");
                    } else {
                        write_file(&path, text)?;
                    }
                }
            }
        }
    }
    if !dry_run {
        tracing::info!(output = %output.display(), "wrote landing zone");
        println!("Compiled {} to {}", config_path.display(), output.display());
    }
    Ok(())
}

fn validate(config_path: &Path) -> Result<()> {
    let document = Config::load(config_path)?;
    let store = Store::from_config(document);
    let failing = invalid_forms(&store);
    if failing.is_empty() {
        println!("Configuration is valid");
        Ok(())
    } else {
        for form in &failing {
            println!("invalid: {form}");
        }
        Err(anyhow::anyhow!("{} form(s) failed validation", failing.len()))
    }
}

fn init(config_path: &Path) -> Result<()> {
    let config = Config::default();
    std::fs::write(config_path, config.to_json()?).map_err(|e| ForgeError::OutputWriteError {
        path: config_path.display().to_string(),
        reason: e.to_string(),
    })?;
    println!("Wrote starter configuration to {}", config_path.display());
    Ok(())
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ForgeError::OutputWriteError {
            path: parent.display().to_string(),
            reason: e.to_string(),
        })?;
    }
    std::fs::write(path, text).map_err(|e| {
        ForgeError::OutputWriteError {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}
