//! CLI binary for devfinder.
//!
//! Every invocation is one page load: the controller restores whatever the
//! session cached, then runs the requested command. All diagnostics go to
//! stderr so stdout carries only the results region.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use devfinder::session::{FileStore, MemoryStore, SessionStore};
use devfinder::{
    AppConfig, Bindings, SearchController, SessionBackend, SubmitOutcome, TerminalSurface,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// devfinder: search arXiv, GitHub and Stack Overflow.
#[derive(Parser)]
#[command(name = "devfinder", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Session whose cached result is restored and updated.
    #[arg(long, global = true, env = "DEVFINDER_SESSION", default_value = "default")]
    session: String,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Search one provider.
    Search {
        /// Provider: arxiv, github or stackoverflow.
        #[arg(short, long)]
        provider: String,

        /// Query keywords.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Show the result restored from the current session.
    Restore,

    /// Interactive page: `<provider> <query>`, `:reload`, `:quit`.
    Shell,

    /// End the current session, discarding its cached result.
    EndSession,
}

type Page = SearchController<TerminalSurface, Arc<dyn SessionStore>>;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("devfinder=info,devfinder_search=info")),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(AppConfig::default_config_path);
    let config = AppConfig::load_or_default(&config_path)?;
    config.validate()?;

    match cli.command.unwrap_or(Command::Shell) {
        Command::Search { provider, query } => {
            let store = open_store(&config, &cli.session)?;
            let page = load_page(&config, store)?;
            let outcome = page.submit(&query.join(" "), &provider).await;
            Ok(exit_code(&outcome))
        }
        Command::Restore => {
            let store = open_store(&config, &cli.session)?;
            let page = load_page(&config, store)?;
            if page.restored().is_none() {
                eprintln!("Nothing cached in session {:?}.", cli.session);
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Shell => {
            let store = open_store(&config, &cli.session)?;
            run_shell(&config, store).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::EndSession => {
            end_session(&config, &cli.session)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn open_store(config: &AppConfig, session: &str) -> anyhow::Result<Arc<dyn SessionStore>> {
    let idle = config.session.idle_timeout();
    let store: Arc<dyn SessionStore> = match config.session.backend {
        SessionBackend::File => Arc::new(FileStore::open(&config.session.root(), session, idle)?),
        SessionBackend::Memory => Arc::new(MemoryStore::new(idle)),
    };
    tracing::debug!(session, backend = ?config.session.backend, "session store opened");
    Ok(store)
}

fn load_page(config: &AppConfig, store: Arc<dyn SessionStore>) -> anyhow::Result<Page> {
    let bindings = Bindings {
        surface: TerminalSurface,
        store,
    };
    Ok(SearchController::init(bindings, config)?)
}

fn exit_code(outcome: &SubmitOutcome) -> ExitCode {
    match outcome {
        SubmitOutcome::Rendered(_) | SubmitOutcome::NoResults | SubmitOutcome::Superseded => {
            ExitCode::SUCCESS
        }
        SubmitOutcome::Invalid(_) | SubmitOutcome::Failed(_) => ExitCode::FAILURE,
    }
}

async fn run_shell(config: &AppConfig, store: Arc<dyn SessionStore>) -> anyhow::Result<()> {
    println!("devfinder v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("Type `<provider> <query>` (arxiv, github, stackoverflow), `:reload` or `:quit`.");

    let mut page = load_page(config, Arc::clone(&store))?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => continue,
            ":quit" | ":q" => break,
            ":reload" => {
                // Same session store, fresh page.
                page = load_page(config, Arc::clone(&store))?;
                if page.restored().is_none() {
                    eprintln!("Nothing cached in this session yet.");
                }
            }
            _ => {
                let (provider, query) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
                page.submit(query, provider).await;
            }
        }
    }

    tracing::info!("shell closed");
    Ok(())
}

fn end_session(config: &AppConfig, session: &str) -> anyhow::Result<()> {
    match config.session.backend {
        SessionBackend::File => {
            let store =
                FileStore::open(&config.session.root(), session, config.session.idle_timeout())?;
            store.end()?;
            eprintln!("Session {session:?} ended.");
        }
        SessionBackend::Memory => {
            eprintln!("Memory sessions end with the process; nothing to do.");
        }
    }
    Ok(())
}
