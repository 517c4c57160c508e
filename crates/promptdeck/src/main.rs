use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use promptdeck_common::{logger, AppConfig};
use promptdeck_compose::{extract_placeholders, render_template, unresolved_placeholders};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "promptdeck")]
#[command(about = "PromptDeck - prompt template manager with model-assisted enhancement", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Database path
        #[arg(long)]
        db_path: Option<String>,

        /// Directory with the web client to serve at `/`
        #[arg(long)]
        static_dir: Option<String>,
    },

    /// List the placeholders of a template file
    Placeholders {
        /// Template file
        file: PathBuf,
    },

    /// Render a template file with field values
    Render {
        /// Template file
        file: PathBuf,

        /// Field value as NAME=VALUE (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
    },
}

/// Split `NAME=VALUE` at the first `=`
fn parse_assignment(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => bail!("Invalid field assignment '{}', expected NAME=VALUE", raw),
    }
}

fn read_template(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

async fn serve(config: AppConfig) -> Result<()> {
    logger::setup_logging(&config.log_dir, &config.log_level)?;

    tracing::info!("PromptDeck starting...");
    tracing::info!("Configuration loaded:");
    tracing::info!("  Address: {}", config.server_bind_address());
    tracing::info!("  Database: {}", config.db_base_path.display());

    println!("Server listening on http://{}", config.server_bind_address());

    promptdeck_server::start_server(config).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve {
            host,
            port,
            db_path,
            static_dir,
        }) => {
            // Override with CLI arguments; values from .env never replace them
            std::env::set_var("SERVER_HOST", &host);
            std::env::set_var("SERVER_PORT", port.to_string());
            if let Some(db) = &db_path {
                std::env::set_var("DB_BASE_PATH", db);
            }
            if let Some(dir) = &static_dir {
                std::env::set_var("STATIC_DIR", dir);
            }

            serve(AppConfig::from_env()?).await?;
        }
        Some(Commands::Placeholders { file }) => {
            logger::setup_console_logging("warn")?;
            for name in extract_placeholders(&read_template(&file)?) {
                println!("{}", name);
            }
        }
        Some(Commands::Render { file, set }) => {
            logger::setup_console_logging("warn")?;
            let content = read_template(&file)?;
            let fields = set
                .iter()
                .map(|raw| parse_assignment(raw))
                .collect::<Result<HashMap<_, _>>>()?;

            println!("{}", render_template(&content, &fields));

            let unresolved = unresolved_placeholders(&content, &fields);
            if !unresolved.is_empty() {
                tracing::warn!("Unresolved placeholders: {}", unresolved.join(", "));
            }
        }
        None => {
            // Default: start server with default config
            serve(AppConfig::from_env()?).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("topic=a=b").unwrap(),
            ("topic".to_string(), "a=b".to_string())
        );
        assert_eq!(parse_assignment("empty=").unwrap().1, "");
        assert!(parse_assignment("=x").is_err());
        assert!(parse_assignment("novalue").is_err());
    }

    #[test]
    fn test_cli_parses_render_flags() {
        let cli = Cli::parse_from(["promptdeck", "render", "t.md", "--set", "a=1", "--set", "b=2"]);
        match cli.command {
            Some(Commands::Render { file, set }) => {
                assert_eq!(file, PathBuf::from("t.md"));
                assert_eq!(set, vec!["a=1", "b=2"]);
            }
            _ => panic!("expected render command"),
        }
    }
}
