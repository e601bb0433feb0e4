use std::{net::SocketAddr, path::PathBuf};

use clap::{Parser, Subcommand};
use tenantry_http::runtime::{ServerConfig, ServerConfigBuilder, serve};

#[derive(Parser, Debug)]
#[command(name = "tenantry", version)]
#[command(about = "Tenantry - multi-tenant task service backed by a JSON file")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Flags that override the `TENANTRY_*` environment
#[derive(clap::Args, Debug)]
struct Overrides {
    /// Listen address (overrides TENANTRY_BIND_ADDR)
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Task file path (overrides TENANTRY_TASKS_FILE)
    #[arg(long)]
    tasks_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server until SIGINT or SIGTERM
    Serve {
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Validate the configuration and print it
    Config {
        #[command(flatten)]
        overrides: Overrides,
    },
}

fn load_config(overrides: Overrides) -> Result<ServerConfig, tenantry_http::ConfigError> {
    let mut builder = ServerConfigBuilder::from_env()?;
    if let Some(addr) = overrides.bind {
        builder = builder.bind_addr(addr);
    }
    if let Some(path) = overrides.tasks_file {
        builder = builder.tasks_file(path);
    }
    builder.build()
}

#[tokio::main]
async fn main() {
    // Initialize JSON logging once.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();
    let env_filter = match "info".parse() {
        Ok(directive) => env_filter.add_directive(directive),
        Err(_) => env_filter,
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { overrides } => {
            let config = match load_config(overrides) {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!(error = %e, "Invalid configuration");
                    std::process::exit(1);
                }
            };
            if let Err(e) = serve(config).await {
                tracing::error!(error = %e, "Server failed");
                std::process::exit(1);
            }
        }
        Commands::Config { overrides } => match load_config(overrides) {
            Ok(config) => println!("{config:#?}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_flags_parse() {
        let cli = Cli::try_parse_from([
            "tenantry",
            "serve",
            "--bind",
            "0.0.0.0:9000",
            "--tasks-file",
            "/tmp/tasks.json",
        ])
        .unwrap();

        let Commands::Serve { overrides } = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(overrides.bind.unwrap().port(), 9000);
        assert_eq!(overrides.tasks_file.unwrap(), PathBuf::from("/tmp/tasks.json"));
    }

    #[test]
    fn test_bad_bind_address_is_rejected() {
        assert!(Cli::try_parse_from(["tenantry", "serve", "--bind", "nowhere"]).is_err());
    }
}
