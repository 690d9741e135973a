//! Terminal chat driver.
//!
//! Commands: `/state`, `/reset`, `/clear`, `/persona <name>`,
//! `/strategy <mirror|regulate>`, `/reflect`, `/metrics`, `/quit`.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use affect_core::config::AffectConfig;
use affect_core::{CrisisDetector, Strategy};
use affect_llm::prompt::PromptTemplate;
use affect_llm::{Generator, HttpGenerator, LlmClient, MockGenerator};
use affect_session::{ReplyPolicy, SessionManager, TurnEngine};
use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chat with an affect-aware assistant", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "AFFECT_CONFIG")]
    config: Option<PathBuf>,

    /// Persona preset (key or display name)
    #[arg(short, long)]
    persona: Option<String>,

    /// Backend provider: ollama, openai or none
    #[arg(long)]
    provider: Option<String>,

    /// Model name
    #[arg(short, long)]
    model: Option<String>,

    /// Alternative system prompt template (TOML with a [prompt] table)
    #[arg(long)]
    prompt: Option<PathBuf>,

    /// Answer by echoing instead of calling a backend
    #[arg(long)]
    echo: bool,
}

fn load_config(args: &Args) -> anyhow::Result<AffectConfig> {
    let mut config = match &args.config {
        Some(path) => AffectConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AffectConfig::default(),
    };
    config.llm = config.llm.with_env_overrides();
    if let Some(persona) = &args.persona {
        config.persona.preset.clone_from(persona);
    }
    if let Some(provider) = &args.provider {
        config.llm.provider.clone_from(provider);
    }
    if let Some(model) = &args.model {
        config.llm.model.clone_from(model);
    }
    config.validate()?;
    Ok(config)
}

fn prompt_line() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let generator: Arc<dyn Generator> = if args.echo {
        Arc::new(MockGenerator::echo())
    } else {
        let client = LlmClient::from_config(&config.llm)?;
        Arc::new(HttpGenerator::new(client, config.llm.request_timeout_ms))
    };
    info!(backend = %generator.describe(), "generation backend ready");

    let mut policy = ReplyPolicy::from_config(&config.llm);
    if let Some(path) = &args.prompt {
        policy = policy.with_template(PromptTemplate::from_file(path)?);
    }
    let engine = TurnEngine::new(generator, policy)
        .with_crisis_detector(CrisisDetector::from_config(&config.safety));
    let manager = SessionManager::new(config, engine);
    let id = manager.open()?;

    println!("Type a message, or /state /reset /clear /persona <name> /strategy <mirror|regulate> /reflect /metrics /quit.");
    prompt_line()?;

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        input.clear();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim();

        match line.split_once(' ').unwrap_or((line, "")) {
            ("", _) => {}
            ("/quit" | "/exit", _) => break,
            ("/state", _) => {
                let snapshot = manager.with_session(id, |s| s.snapshot()).await?;
                println!("{snapshot}");
            }
            ("/reset", _) => {
                manager.with_session_mut(id, |s| s.reset_mood()).await?;
                println!("Mood, memories and attachment reset.");
            }
            ("/clear", _) => {
                manager.with_session_mut(id, |s| s.clear_chat()).await?;
                println!("Chat cleared.");
            }
            ("/persona", name) => {
                match manager.with_session_mut(id, |s| s.set_persona(name.trim())).await? {
                    Ok(()) => println!("Persona set to {}.", name.trim()),
                    Err(e) => println!("{e}"),
                }
            }
            ("/strategy", value) => match value.parse::<Strategy>() {
                Ok(strategy) => {
                    manager
                        .with_session_mut(id, |s| s.controls.set_strategy(strategy))
                        .await?;
                    println!("Strategy set to {strategy}.");
                }
                Err(e) => println!("{e}"),
            },
            ("/reflect", _) => {
                let last = manager
                    .with_session(id, |s| s.reflections().back().map(|r| r.text.clone()))
                    .await?;
                println!("{}", last.unwrap_or_else(|| "No reflections yet.".into()));
            }
            ("/metrics", _) => print!("{}", manager.counters().to_prometheus()),
            _ => {
                let outcome = manager.handle_turn(id, line).await?;
                println!("\n[{}] {}\n", outcome.label, outcome.reply);
            }
        }
        prompt_line()?;
    }

    manager.close(id)?;
    Ok(())
}
