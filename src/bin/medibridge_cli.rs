//! medibridge-cli: run triage predictions and chat replies from the terminal
//!
//! Usage:
//!   medibridge-cli predict <symptoms...>        Structured triage prediction (JSON)
//!   medibridge-cli chat <message>               One chat reply
//!   medibridge-cli models                       Show candidate order and timeout
//!   medibridge-cli version | help

use medibridge_ai::{ChatSession, ClientConfig, CompletionClientBuilder, Symptoms};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let (config_path, rest) = split_config_flag(&args[2..]);

    match args[1].as_str() {
        "predict" => cmd_predict(config_path, &rest).await,
        "chat" => cmd_chat(config_path, &rest).await,
        "models" => cmd_models(config_path),
        "version" | "--version" | "-V" => {
            println!("medibridge-cli {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!(
        r#"medibridge-cli - MediBridge completion client

USAGE:
    medibridge-cli <COMMAND> [--config <file.yaml>] [ARGS]

COMMANDS:
    predict <symptoms...>    Structured triage prediction, printed as JSON
    chat <message>           Single chat reply
    models                   Show candidate models in fallback order
    version                  Show version information
    help                     Show this help message

ENVIRONMENT:
    OPENROUTER_API_KEY       Provider API key (when no keyring entry exists)
    MEDIBRIDGE_MODELS        Comma-separated candidate list
    MEDIBRIDGE_BASE_URL      Provider base URL
    MEDIBRIDGE_TIMEOUT_SECS  Per-candidate timeout
    RUST_LOG                 Log filter, e.g. medibridge_ai=info"#
    );
}

fn split_config_flag(args: &[String]) -> (Option<PathBuf>, Vec<String>) {
    let mut config = None;
    let mut rest = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            config = iter.next().map(PathBuf::from);
        } else {
            rest.push(arg.clone());
        }
    }
    (config, rest)
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<ClientConfig> {
    let base = match path {
        Some(p) => ClientConfig::from_file(p)?,
        None => ClientConfig::default(),
    };
    Ok(base.apply_env()?)
}

async fn cmd_predict(config_path: Option<PathBuf>, args: &[String]) -> anyhow::Result<()> {
    if args.is_empty() {
        anyhow::bail!("predict needs symptom text");
    }
    let client = CompletionClientBuilder::new()
        .with_config(load_config(config_path)?)
        .build()?;

    let symptoms = Symptoms::Text(args.join(" "));
    match client.predict_report(symptoms).await {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{} [{}]", e.user_message(), e.kind());
            std::process::exit(2);
        }
    }
}

async fn cmd_chat(config_path: Option<PathBuf>, args: &[String]) -> anyhow::Result<()> {
    if args.is_empty() {
        anyhow::bail!("chat needs a message");
    }
    let client = CompletionClientBuilder::new()
        .with_config(load_config(config_path)?)
        .build()?;
    let session = ChatSession::new(client);

    match session.reply(&[], &args.join(" ")).await {
        Ok(result) => {
            println!("{}", result.content);
            eprintln!("(model: {})", result.model);
            Ok(())
        }
        Err(e) => {
            eprintln!("{} [{}]", e.user_message(), e.kind());
            std::process::exit(2);
        }
    }
}

fn cmd_models(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    config.validate()?;
    println!("endpoint: {}/chat/completions", config.base_url.trim_end_matches('/'));
    println!("timeout:  {}s per candidate", config.timeout_secs);
    for (rank, model) in config.candidates.iter().enumerate() {
        println!("  {}. {}", rank + 1, model);
    }
    Ok(())
}
