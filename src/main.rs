use std::collections::HashMap;
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use slopewatch::presentation::slope_table::{format_table, rows};
use slopewatch::presentation::SUGGESTIONS_ERROR_MESSAGE;
use slopewatch::{
    AzureOpenAiClient, AzureOpenAiConfig, ChatClient, Query, ScriptedChatClient,
    SearchConditionsUseCase, SearchRange, SearchState, SuggestCitiesUseCase,
};

mod cli;

use cli::Commands;

#[derive(Parser)]
#[command(name = "slopewatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer from canned demo data instead of calling Azure OpenAI
    #[arg(long, global = true)]
    mock_llm: bool,

    /// Overrides AZURE_OPENAI_ENDPOINT
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Overrides AZURE_OPENAI_API_KEY
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Overrides AZURE_OPENAI_API_VERSION
    #[arg(long, global = true)]
    api_version: Option<String>,

    /// Overrides AZURE_OPENAI_DEPLOYMENT
    #[arg(long, global = true)]
    deployment: Option<String>,

    /// Overrides AZURE_OPENAI_TIMEOUT_SECS
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Flag values keyed by the environment variable they replace.
    fn config_overrides(&self) -> HashMap<&'static str, String> {
        let mut overrides = HashMap::new();
        let flags = [
            ("AZURE_OPENAI_ENDPOINT", self.endpoint.clone()),
            ("AZURE_OPENAI_API_KEY", self.api_key.clone()),
            ("AZURE_OPENAI_API_VERSION", self.api_version.clone()),
            ("AZURE_OPENAI_DEPLOYMENT", self.deployment.clone()),
            (
                "AZURE_OPENAI_TIMEOUT_SECS",
                self.timeout_secs.map(|secs| secs.to_string()),
            ),
        ];
        for (key, value) in flags {
            if let Some(value) = value {
                overrides.insert(key, value);
            }
        }
        overrides
    }

    fn azure_config(&self) -> Result<AzureOpenAiConfig> {
        let overrides = self.config_overrides();
        let config = AzureOpenAiConfig::from_lookup(|key| {
            overrides
                .get(key)
                .cloned()
                .or_else(|| std::env::var(key).ok())
        })?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, &cli.command)?;

    let chat_client: Arc<dyn ChatClient> = if cli.mock_llm {
        info!("Using scripted chat client with demo data");
        Arc::new(ScriptedChatClient::new())
    } else {
        let config = cli.azure_config()?;
        info!(
            "Using Azure OpenAI deployment {} at {}",
            config.deployment, config.endpoint
        );
        Arc::new(AzureOpenAiClient::new(config)?)
    };

    match cli.command {
        Commands::Suggest { prefix } => {
            let use_case = SuggestCitiesUseCase::new(chat_client);

            match use_case.execute(&prefix).await {
                Ok(list) if list.is_empty() => println!("No suggestions."),
                Ok(list) => {
                    for city in list.iter() {
                        println!("{}", city);
                    }
                }
                Err(e) => {
                    tracing::warn!("Suggestion request failed: {}", e);
                    bail!(SUGGESTIONS_ERROR_MESSAGE);
                }
            }
        }

        Commands::Search { city, range } => {
            let range = SearchRange::parse(&range);
            let query = Query::conditions(1, city.trim(), range);
            let use_case = SearchConditionsUseCase::new(chat_client);

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .expect("Invalid spinner template"),
            );
            spinner.set_message(format!("Searching {}", query.summary()));
            spinner.enable_steady_tick(Duration::from_millis(100));

            let result = use_case.execute(&city, range).await;
            spinner.finish_and_clear();

            let state = SearchState::resolve(&query, result);
            if let Some(heading) = state.heading() {
                println!("{}\n", heading);
                println!("{}", format_table(&rows(state.slopes())));
                return Ok(());
            }

            let message = state.message().unwrap_or_default();
            if let Some(payload) = state.debug_payload() {
                println!("Raw model response:\n{}\n", payload);
            }
            match state {
                SearchState::EmptyResult { .. } => println!("{}", message),
                _ => bail!(message),
            }
        }

        Commands::Tui { .. } => {
            slopewatch::connector::tui::run(chat_client).await?;
        }
    }

    Ok(())
}

/// Log to stderr for one-shot commands. The TUI owns the terminal, so it
/// logs to a file when one is given and not at all otherwise.
fn init_logging(verbose: bool, command: &Commands) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false);

    match command {
        Commands::Tui {
            log_file: Some(path),
        } => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let subscriber = builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        Commands::Tui { log_file: None } => {}
        _ => {
            let subscriber = builder.with_writer(std::io::stderr).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn negative_range_is_accepted_as_text() {
        let cli = Cli::try_parse_from(["slopewatch", "search", "Zakopane", "--range", "-5"])
            .expect("parse");
        match cli.command {
            Commands::Search { city, range } => {
                assert_eq!(city, "Zakopane");
                assert_eq!(SearchRange::parse(&range).km(), 100);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn flags_override_environment_keys() {
        let cli = Cli::try_parse_from([
            "slopewatch",
            "--endpoint",
            "https://example.openai.azure.com",
            "--timeout-secs",
            "5",
            "suggest",
            "Kr",
        ])
        .expect("parse");
        let overrides = cli.config_overrides();
        assert_eq!(
            overrides.get("AZURE_OPENAI_ENDPOINT").map(String::as_str),
            Some("https://example.openai.azure.com")
        );
        assert_eq!(
            overrides.get("AZURE_OPENAI_TIMEOUT_SECS").map(String::as_str),
            Some("5")
        );
        assert!(!overrides.contains_key("AZURE_OPENAI_API_KEY"));
    }

    #[test]
    fn mock_flag_is_global() {
        let cli = Cli::try_parse_from(["slopewatch", "tui", "--mock-llm"]).expect("parse");
        assert!(cli.mock_llm);
        assert!(matches!(cli.command, Commands::Tui { log_file: None }));
    }
}
