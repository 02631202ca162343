// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tokenpay - receipt verification and token crediting.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod verify;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokenpay_config::TokenpayConfig;
use tokenpay_core::Provider;

/// Tokenpay - receipt verification and token crediting.
#[derive(Parser, Debug)]
#[command(name = "tokenpay", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway.
    Serve,
    /// Look one receipt up without crediting anything.
    Verify {
        /// telebirr, cbe or abyssinia.
        #[arg(long)]
        provider: Provider,
        #[arg(long)]
        reference: String,
        /// Account suffix, required for cbe and abyssinia.
        #[arg(long)]
        suffix: Option<String>,
    },
    /// Print the effective configuration with secrets redacted.
    Config,
}

fn load_config(path: Option<&std::path::Path>) -> TokenpayConfig {
    let result = match path {
        Some(path) => tokenpay_config::load_and_validate_path(path),
        None => tokenpay_config::load_and_validate(),
    };
    match result {
        Ok(config) => config,
        Err(errors) => {
            tokenpay_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Some(Commands::Serve) => {
            serve::init_tracing(&config.server.log_level);
            if let Err(e) = serve::run_serve(config).await {
                tracing::error!(error = %e, "serve failed");
                eprintln!("tokenpay serve: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Verify {
            provider,
            reference,
            suffix,
        }) => {
            serve::init_tracing(&config.server.log_level);
            match verify::run_verify(&config, provider, reference, suffix).await {
                Ok(json) => println!("{json}"),
                Err(message) => {
                    eprintln!("tokenpay verify: {message}");
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config.redacted()) {
            Ok(printed) => print!("{printed}"),
            Err(e) => {
                eprintln!("tokenpay config: failed to render configuration: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("tokenpay: use --help for available commands");
        }
    }
}
