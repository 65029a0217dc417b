use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use teller_core::config::{Config, StrategyKind};
use teller_core::knowledge::BANKING_DOCUMENTS;
use teller_core::rag::DocumentIndex;
use teller_core::{Assistant, ConversationLog, OllamaProvider, Provider, Reply};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "teller")]
#[command(about = "Retrieval-augmented banking assistant backed by a local model server", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[arg(short, long, value_enum, help = "Override the retrieval strategy from the config")]
    strategy: Option<StrategyArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Dense,
    Lexical,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Dense => StrategyKind::Dense,
            StrategyArg::Lexical => StrategyKind::Lexical,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Start an interactive chat session")]
    Chat,

    #[command(about = "Ask a single question")]
    Ask {
        #[arg(required = true, help = "The question to ask")]
        question: Vec<String>,
    },

    #[command(about = "Show the passages retrieved for a query")]
    Search {
        #[arg(required = true, help = "Search query")]
        query: Vec<String>,

        #[arg(short, long, help = "Number of passages (defaults to rag.top_k)")]
        k: Option<usize>,
    },

    #[command(about = "Show current configuration")]
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("teller_core=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;
    if let Some(strategy) = cli.strategy {
        config.rag.strategy = strategy.into();
    }

    match cli.command {
        Commands::Chat => chat(config).await,
        Commands::Ask { question } => ask(config, &question.join(" ")).await,
        Commands::Search { query, k } => search(config, &query.join(" "), k).await,
        Commands::Show => {
            show_config(&config);
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path).with_context(|| format!("Failed to load config from {}", path.display()))
    } else {
        Ok(Config::default())
    }
}

async fn build_assistant(config: Config) -> Result<Assistant> {
    let strategy = config.rag.strategy;
    println!(
        "{} Indexing {} passages ({} retrieval)...",
        "→".blue(),
        BANKING_DOCUMENTS.len(),
        strategy
    );

    Assistant::new(config).await.with_context(|| match strategy {
        StrategyKind::Dense => "Could not build the knowledge base. Is Ollama running with the embedding model pulled? \
             Try --strategy lexical to run retrieval without it."
            .to_string(),
        StrategyKind::Lexical => "Could not build the knowledge base".to_string(),
    })
}

async fn chat(config: Config) -> Result<()> {
    let assistant = build_assistant(config).await?;
    let mut log = ConversationLog::new();

    println!("{}", "Banking assistant ready.".bold().green());
    println!("Type {} to leave, {} to review the conversation.", "exit".bold(), "/history".bold());

    let stdin = io::stdin();
    loop {
        print!("\n{} ", "you>".cyan().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();
        match input {
            "" => continue,
            "exit" | "quit" => break,
            "/history" => {
                print_history(&log);
                continue;
            }
            _ => {}
        }

        let reply = assistant.respond(&mut log, input).await;
        print_reply(&reply, false);
    }

    Ok(())
}

async fn ask(config: Config, question: &str) -> Result<()> {
    let assistant = build_assistant(config).await?;
    let mut log = ConversationLog::new();

    let reply = assistant.respond(&mut log, question).await;
    print_reply(&reply, true);
    Ok(())
}

async fn search(config: Config, query: &str, k: Option<usize>) -> Result<()> {
    let provider: Arc<dyn Provider> =
        Arc::new(OllamaProvider::new(&config).context("Failed to create Ollama client")?);
    let k = k.unwrap_or(config.rag.top_k);

    let index = DocumentIndex::from_config(&config, provider, BANKING_DOCUMENTS.iter().copied())
        .await
        .context("Failed to build the knowledge base")?;

    let hits = index.search(query, k).await;
    if hits.is_empty() {
        println!("{}", "No passages retrieved.".yellow());
        return Ok(());
    }

    println!("{} ({} retrieval)", "Top passages:".bold().green(), index.strategy());
    println!();
    for (rank, hit) in hits.iter().enumerate() {
        println!("  {} {} {}", format!("{}.", rank + 1).cyan(), format!("[#{}]", hit.id()).dimmed(), hit.content());
    }
    Ok(())
}

fn print_reply(reply: &Reply, with_sources: bool) {
    let label = if reply.blocked { "assistant (blocked)>".red().bold() } else { "assistant>".green().bold() };
    println!("{} {}", label, reply.content);

    if with_sources && !reply.sources.is_empty() {
        println!();
        println!("{}", "Sources:".bold());
        for source in &reply.sources {
            println!("  {} {}", "•".cyan(), source);
        }
    }
}

fn print_history(log: &ConversationLog) {
    if log.is_empty() {
        println!("{}", "No messages yet.".yellow());
        return;
    }

    for turn in log.turns() {
        println!(
            "{} {:<9} {}",
            turn.timestamp.format("%H:%M:%S").to_string().dimmed(),
            turn.role.to_string().bold(),
            turn.content
        );
    }
}

fn show_config(config: &Config) {
    println!("{}", "Current Configuration:".bold().green());
    println!();
    println!("{}", "LLM:".bold());
    println!("  Model:           {}", config.llm.model.cyan());
    println!("  Base URL:        {}", config.llm.base_url);
    println!("  Timeout:         {}s", config.llm.timeout_secs);
    println!();
    println!("{}", "RAG:".bold());
    println!("  Strategy:        {}", config.rag.strategy.to_string().cyan());
    println!("  Embedding Model: {}", config.rag.embedding_model.cyan());
    println!("  Embedding Dim:   {}", config.rag.embedding_dim);
    println!("  Top K:           {}", config.rag.top_k);
    println!();
    println!("{}", "Guardrails:".bold());
    for topic in &config.guardrails.forbidden_topics {
        println!("  {} {}", "•".cyan(), topic);
    }
    println!();
    println!("{}", "Policy:".bold());
    for line in config.system_prompt.lines() {
        println!("  {}", line);
    }
}
