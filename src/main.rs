//! gamelink - open the game recommendation page for a title
//!
//! - `open` hands the title to the default browser
//! - `ui` serves the submission page locally
//! - `lookup` resolves a title against the configured catalog

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::*;
use gamelink::api_routes::AppState;
use gamelink::catalog::{CatalogError, GameRecord, Recommender};
use gamelink::config::Config;
use gamelink::server;
use gamelink::submission::{
    extract_game_param, ExternalOpener, TargetBase, TitleSubmissionHandler,
};
use tracing_subscriber::EnvFilter;

/// gamelink - Send a game title to the recommendation page
#[derive(Parser)]
#[command(name = "gamelink")]
#[command(version)]
#[command(about = "Open the game recommendation page for a title")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the game page for a title in the default browser
    Open {
        /// Game title (e.g., "Catan & Co")
        title: String,

        /// Host of the game page (defaults to config)
        #[arg(long)]
        host: Option<String>,

        /// Port of the game page (defaults to config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the URL a title is submitted to
    Url {
        /// Game title
        title: String,

        /// Print the in-page form (`/?game=...`) instead of an absolute URL
        #[arg(long)]
        relative: bool,
    },

    /// Start the web UI
    Ui {
        /// Port to run the server on (defaults to config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not auto-open the browser
        #[arg(long, default_value_t = false)]
        no_open: bool,

        /// Preselect this game when opening the browser
        #[arg(short, long)]
        game: Option<String>,
    },

    /// Look up a title, genre, or game page URL in the catalog
    Lookup {
        /// Title, genre, or URL containing `?game=`
        game: String,
    },

    /// Show the config file location and effective settings
    Config {
        /// Write the default config file if none exists yet
        #[arg(long)]
        init: bool,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gamelink=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Open { title, host, port } => {
            let config = load_config_or_default();
            let base = TargetBase::origin(
                host.unwrap_or_else(|| config.target.host.clone()),
                port.unwrap_or(config.target.port),
            );
            println!(
                "{} {}",
                "Opening".bright_cyan(),
                base.url_for(&title).bright_white()
            );
            TitleSubmissionHandler::new(title, base, ExternalOpener).dispatch();
        }
        Commands::Url { title, relative } => {
            let base = if relative {
                TargetBase::Relative
            } else {
                load_config_or_default().target.base()
            };
            println!("{}", base.url_for(&title));
        }
        Commands::Ui {
            port,
            no_open,
            game,
        } => {
            let config = Config::load()?;
            let port = port.unwrap_or(config.server.port);
            let open_browser = config.server.open_browser && !no_open;
            let state = AppState::new(Recommender::load(&config.catalog)?);

            println!(
                "{}",
                format!("Starting web UI at http://127.0.0.1:{port}").bright_cyan()
            );
            if open_browser {
                println!(
                    "{}",
                    "Your default browser should open automatically.".bright_white()
                );
            }
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(server::start_server(port, open_browser, game, state))?;
        }
        Commands::Lookup { game } => {
            let title = lookup_title(&game)?;
            let config = Config::load()?;
            let recommender = Recommender::load(&config.catalog)?
                .ok_or(CatalogError::NotConfigured)?;
            run_lookup(&recommender, &title)?;
        }
        Commands::Config { init } => {
            let path = Config::config_path()?;
            let config = if init {
                let existed = path.exists();
                let config = Config::init()?;
                let status = if existed { "Config file:" } else { "Created config file:" };
                println!("{} {}", status.bright_green(), path.display());
                config
            } else {
                println!("{} {}", "Config file:".bright_yellow(), path.display());
                if !path.exists() {
                    println!("{}", "(not created yet, showing defaults)".dimmed());
                }
                Config::load()?
            };
            println!("\n{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

/// The target URL does not depend on the config file, so a broken file only
/// costs the user their overrides.
fn load_config_or_default() -> Config {
    Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Ignoring unreadable config, using defaults");
        Config::default()
    })
}

/// Accept either a plain title or a URL carrying `?game=`.
///
/// Only input shaped like a URL or a query string is parsed; titles may
/// contain `?` themselves.
fn lookup_title(input: &str) -> Result<String> {
    let is_url = ["/", "http://", "https://", "?", "game="]
        .iter()
        .any(|prefix| input.starts_with(prefix));
    if !is_url {
        return Ok(input.to_string());
    }
    match extract_game_param(input)? {
        Some(title) => Ok(title),
        None => bail!("No `game` parameter in {input}"),
    }
}

fn run_lookup(recommender: &Recommender, title: &str) -> Result<()> {
    let genre_games = recommender.catalog().by_genre(title);
    if !genre_games.is_empty() {
        println!(
            "{} {}\n",
            "Games in genre".bright_yellow().bold(),
            title.bright_white()
        );
        for (i, game) in genre_games.iter().enumerate() {
            println!("  {:2}. {}", i + 1, game.title.bright_white());
        }
        return Ok(());
    }

    match recommender.recommend(title) {
        Ok(recs) => {
            println!(
                "\n{} {} ({})",
                "The recommended games for".bright_cyan().bold(),
                recs.game.title.bright_white().bold(),
                recs.wiki_url.dimmed()
            );
            println!("{}", "=".repeat(recs.game.title.len() + 27).bright_cyan());
            for (i, game) in recs.matches.iter().enumerate() {
                print_match(i + 1, game);
            }
            Ok(())
        }
        Err(CatalogError::UnknownTitle(_)) => {
            println!(
                "{} '{}' {}",
                "Game".bright_red(),
                title.bright_yellow(),
                "not found in the catalog.".bright_red()
            );
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn print_match(rank: usize, game: &GameRecord) {
    println!("\n{} {}", format!("{rank}.").bright_yellow(), game.title.bright_white());
    for (label, value) in [
        ("Genre:", &game.genre),
        ("Developer:", &game.developer),
        ("Publisher:", &game.publisher),
    ] {
        if !value.is_empty() {
            println!("   {} {}", label.bright_yellow(), value);
        }
    }
    println!("   {} {}", "Wiki:".bright_yellow(), game.wiki_url().dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_title_accepts_titles_and_urls() {
        assert_eq!(lookup_title("Chess").unwrap(), "Chess");
        assert_eq!(
            lookup_title("http://localhost:8501/?game=Catan%20%26%20Co").unwrap(),
            "Catan & Co"
        );
        assert!(lookup_title("http://localhost:8501/?other=1").is_err());
        assert_eq!(lookup_title("/?game=Go").unwrap(), "Go");
        assert_eq!(lookup_title("game=Shogi").unwrap(), "Shogi");
    }

    #[test]
    fn lookup_title_keeps_question_marks_in_titles() {
        assert_eq!(
            lookup_title("Who Wants to Be a Millionaire?").unwrap(),
            "Who Wants to Be a Millionaire?"
        );
        assert_eq!(lookup_title("Why? Because!").unwrap(), "Why? Because!");
    }

    #[test]
    fn cli_parses_config_init() {
        let cli = Cli::parse_from(["gamelink", "config", "--init"]);
        assert!(matches!(cli.command, Commands::Config { init: true }));
        let cli = Cli::parse_from(["gamelink", "config"]);
        assert!(matches!(cli.command, Commands::Config { init: false }));
    }

    #[test]
    fn cli_parses_open_with_overrides() {
        let cli = Cli::parse_from(["gamelink", "open", "Go", "--host", "127.0.0.1", "-p", "9000"]);
        match cli.command {
            Commands::Open { title, host, port } => {
                assert_eq!(title, "Go");
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected open command"),
        }
    }
}
