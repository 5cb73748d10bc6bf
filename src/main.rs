use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mcp_spellcheck::checker::spellcheck_text;
use mcp_spellcheck::config::{self, Config};
use mcp_spellcheck::dictionary::WordFrequency;
use mcp_spellcheck::server;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

/// MCP server that spellchecks markdown documents, locally or in GitHub repositories
#[derive(Parser)]
#[command(name = "mcp-spellcheck", version, about)]
struct Cli {
    /// GitHub personal access token.
    /// Can also be set via GITHUB_PERSONAL_ACCESS_TOKEN or GITHUB_TOKEN.
    #[arg(long, global = true)]
    token: Option<String>,

    /// Read GitHub token from this environment variable instead
    #[arg(long = "token-env", global = true)]
    token_env: Option<String>,

    /// Default repository owner/org for GitHub operations
    #[arg(long, global = true)]
    owner: Option<String>,

    /// Extra word that is never reported as misspelled (repeatable)
    #[arg(long = "allow-word", global = true)]
    allow_words: Vec<String>,

    /// File of allowed words, one per line
    #[arg(long = "allow-list-file", global = true)]
    allow_list_file: Option<PathBuf>,

    /// Additional word list (`word count` or `word` per line, repeatable)
    #[arg(long = "dictionary", global = true)]
    dictionaries: Vec<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the MCP server on stdio (default)
    Serve,
    /// Spellcheck a local markdown file and print the result as JSON
    Check {
        /// File to check; reads stdin when omitted or `-`
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config {
        token: config::resolve_token(cli.token, cli.token_env.as_deref(), |name| {
            std::env::var(name).ok()
        }),
        default_owner: cli.owner,
        allow_list: Config::build_allow_list(&cli.allow_words, cli.allow_list_file.as_deref())
            .context("Failed to load allow-list")?,
        dictionary_files: cli.dictionaries,
    };

    let dictionary = config
        .load_dictionary()
        .context("Failed to load dictionary")?;

    tracing::info!(
        words = dictionary.len(),
        allowed = config.allow_list.len(),
        "Loaded dictionary"
    );

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, dictionary).await,
        Command::Check { path } => {
            let text = read_input(path.as_deref())?;
            let report = spellcheck_text(&text, &Arc::new(dictionary), config.allow_list.as_slice());
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

async fn serve(config: Config, dictionary: WordFrequency) -> Result<()> {
    let github = if let Some(ref t) = config.token {
        octocrab::OctocrabBuilder::new()
            .personal_token(t.clone())
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create GitHub client: {}", e))?
    } else {
        tracing::warn!(
            "No GitHub token provided; API rate limits will be very restrictive and create_issue will fail"
        );
        octocrab::Octocrab::default()
    };

    tracing::info!(
        authenticated = config.token.is_some(),
        owner = config.default_owner.as_deref().unwrap_or("none"),
        "Starting mcp-spellcheck server"
    );

    let service = server::McpSpellcheckServer::new(
        github,
        config.default_owner,
        dictionary,
        config.allow_list,
    );
    let running = service.serve(stdio()).await?;
    running.waiting().await?;

    Ok(())
}

fn read_input(path: Option<&std::path::Path>) -> Result<String> {
    match path {
        Some(p) if p.as_os_str() != "-" => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read {}", p.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}
