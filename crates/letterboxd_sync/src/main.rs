mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use console::style;
use letterboxd_core::{DiaryEntry, FilmResult, LetterboxdClient};
use tokio::runtime::Builder;

use config::{Account, ConfigStore, SyncConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Log watched films to a Letterboxd diary", long_about = None)]
struct Cli {
    /// Custom configuration file path
    #[arg(long = "config-path", global = true)]
    config_path: Option<PathBuf>,

    /// Account to use (defaults to the first enabled one)
    #[arg(short = 'a', long = "account", global = true)]
    account: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Site(SiteCommand),

    /// Store an account in the configuration file
    AddAccount {
        username: String,
        password: String,

        /// Store the account without selecting it by default
        #[arg(long = "disabled")]
        disabled: bool,
    },
}

#[derive(Subcommand, Debug)]
enum SiteCommand {
    /// Look up the Letterboxd film for a TMDB id
    Resolve {
        tmdb_id: u64,

        /// Print the film as JSON
        #[arg(long = "json")]
        json: bool,
    },

    /// Show the most recent diary date for a TMDB id
    LastLogged { tmdb_id: u64 },

    /// Add a diary entry for a TMDB id
    Mark {
        tmdb_id: u64,

        /// Viewing date (YYYY-MM-DD); today when omitted
        #[arg(short = 'd', long = "date")]
        date: Option<NaiveDate>,

        /// Tag to attach (repeatable, only sent with --date)
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,

        /// Mark the film as liked
        #[arg(long = "liked")]
        liked: bool,

        /// Skip when the diary already has an entry on the viewing date
        #[arg(long = "skip-if-logged")]
        skip_if_logged: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::AddAccount {
            username,
            password,
            disabled,
        } => add_account(cli.config_path, username, password, !disabled),
        Command::Site(command) => {
            let store = ConfigStore::load(cli.config_path)?;
            let rt = Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("failed to start the async runtime")?;
            rt.block_on(run(store.config(), cli.account.as_deref(), command))
        }
    }
}

fn add_account(
    config_path: Option<PathBuf>,
    username: String,
    password: String,
    enabled: bool,
) -> Result<()> {
    let mut store = ConfigStore::load_or_default(config_path)?;
    store.upsert_account(Account {
        username: username.clone(),
        password,
        enabled,
    })?;
    println!(
        "{} {} -> {}",
        style("Saved account").green(),
        username,
        store.path().display()
    );
    Ok(())
}

async fn run(config: &SyncConfig, account: Option<&str>, command: SiteCommand) -> Result<()> {
    match command {
        SiteCommand::Resolve { tmdb_id, json } => {
            let client = LetterboxdClient::new(config.client_options())?;
            let film = resolve(&client, tmdb_id).await?;
            if json {
                println!("{}", film_json(&film)?);
            } else {
                print_film(&film);
            }
        }
        SiteCommand::LastLogged { tmdb_id } => {
            let client = login(config, account).await?;
            let film = resolve(&client, tmdb_id).await?;
            print_film(&film);
            match client.last_logged_date(&film.slug).await? {
                Some(date) => println!("{} {}", style("Last logged:").green(), date),
                None => println!("{}", style("Not in the diary yet.").yellow()),
            }
        }
        SiteCommand::Mark {
            tmdb_id,
            date,
            tags,
            liked,
            skip_if_logged,
        } => {
            let mut client = login(config, account).await?;
            let film = resolve(&client, tmdb_id).await?;
            print_film(&film);

            if skip_if_logged {
                let viewing_date = date.unwrap_or_else(letterboxd_core::dates::today);
                let last = client.last_logged_date(&film.slug).await?;
                if already_logged(last, viewing_date) {
                    println!(
                        "{} {}",
                        style("Already logged on").yellow(),
                        viewing_date
                    );
                    return Ok(());
                }
            }

            let entry = DiaryEntry {
                film_id: film.film_id.clone(),
                date,
                tags,
                liked,
            };
            client
                .mark_watched(&entry)
                .await
                .with_context(|| format!("failed to log {}", film.slug))?;
            println!("{} {}", style("Logged").green().bold(), film.slug);
        }
    }
    Ok(())
}

async fn login(config: &SyncConfig, account: Option<&str>) -> Result<LetterboxdClient> {
    let account = config.select_account(account)?;
    let mut client = LetterboxdClient::new(config.client_options())?;
    client
        .authenticate(&account.username, &account.password)
        .await
        .with_context(|| format!("login failed for {}", account.username))?;
    log::info!("authenticated as {}", account.username);
    Ok(client)
}

async fn resolve(client: &LetterboxdClient, tmdb_id: u64) -> Result<FilmResult> {
    client
        .resolve_by_external_id(tmdb_id)
        .await
        .with_context(|| format!("no Letterboxd film for tmdb id {tmdb_id}"))
}

fn already_logged(last: Option<NaiveDate>, viewing_date: NaiveDate) -> bool {
    last == Some(viewing_date)
}

fn film_json(film: &FilmResult) -> Result<String> {
    serde_json::to_string(film).context("failed to serialize film")
}

fn print_film(film: &FilmResult) {
    println!(
        "{} {} {}",
        style("Film:").cyan(),
        film.slug,
        style(format!("(id {})", film.film_id)).dim()
    );
}
