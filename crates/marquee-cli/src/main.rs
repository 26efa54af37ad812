use std::process::ExitCode;

use clap::{Parser, Subcommand};
use url::Url;

use marquee_api::traits::{AccountService, CatalogService};
use marquee_api::types::{Credentials, Movie, MovieId, Registration, Review};
use marquee_api::{AccountClient, CatalogClient, Connection};
use marquee_core::config::AppConfig;
use marquee_core::detail::{DetailScreen, ReviewOutcome, ScreenPhase};
use marquee_core::membership::resolve_membership;
use marquee_core::session::SessionStore;
use marquee_core::toggle::{MembershipKind, ToggleController, ToggleOutcome};
use marquee_core::CoreError;

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal client for the marquee movie catalog")]
struct Cli {
    /// Override the configured server base URL.
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session.
    Login { username: String, password: String },
    /// Create an account, then sign in with `login`.
    Register {
        username: String,
        email: String,
        password: String,
    },
    /// End the session.
    Logout,
    /// List currently trending movies.
    Trending,
    /// Search the catalog by title.
    Search { query: String },
    /// Show one movie with its reviews and your membership flags.
    Show { movie_id: MovieId },
    /// List your watchlist, or toggle a movie in and out of it.
    Watchlist {
        #[command(subcommand)]
        action: Option<ListAction>,
    },
    /// List your favorites, or toggle a movie in and out of them.
    Favorites {
        #[command(subcommand)]
        action: Option<ListAction>,
    },
    /// Submit a rating and review for a movie.
    Review {
        movie_id: MovieId,
        /// Rating from 0.5 to 10 in half-point steps.
        #[arg(long)]
        rating: f32,
        #[arg(long)]
        text: String,
    },
    /// Show or update the stored configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ListAction {
    Toggle { movie_id: MovieId },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the stored configuration and where it lives.
    Show,
    /// Store a new server base URL.
    SetServer { url: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter("marquee=info,marquee_core=info,marquee_api=info")
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, CoreError> {
    let config = AppConfig::load()?;
    // Config commands work on the stored file alone; no client needed.
    if let Command::Config { action } = &cli.command {
        return run_config(config, action);
    }

    let base_url = cli.server.as_deref().unwrap_or(&config.server.base_url);
    let base_url =
        Url::parse(base_url).map_err(|e| CoreError::Config(format!("bad server URL: {e}")))?;

    let mut store = SessionStore::open_default();
    let conn = Connection::with_session_cookie(
        base_url.clone(),
        config.server.timeout(),
        store.cookie(),
    )?;
    tracing::debug!(server = %base_url, signed_in = store.current().is_some(), "client ready");

    let catalog = CatalogClient::new(conn.clone());
    let account = AccountClient::new(conn.clone());

    match cli.command {
        Command::Login { username, password } => {
            let user = account.login(&Credentials { username, password }).await?;
            store.set(user.clone(), conn.session_cookie())?;
            println!("signed in as {}", user.username);
        }
        Command::Register {
            username,
            email,
            password,
        } => {
            account
                .register(&Registration {
                    username: username.clone(),
                    email,
                    password,
                })
                .await?;
            println!("account {username} created; sign in with `marquee login`");
        }
        Command::Logout => {
            if store.current().is_none() {
                println!("not signed in");
                return Ok(ExitCode::SUCCESS);
            }
            match account.logout().await {
                Ok(()) => {}
                // The server already dropped the session; clear ours too.
                Err(e) if e.is_auth() => {}
                Err(e) => return Err(e.into()),
            }
            store.clear()?;
            println!("signed out");
        }
        Command::Trending => {
            print_movies(&catalog.trending().await?);
        }
        Command::Search { query } => {
            print_movies(&catalog.search(&query).await?);
        }
        Command::Show { movie_id } => {
            let mut screen = DetailScreen::open(movie_id);
            screen.load(&catalog, &account, store.current()).await?;
            print_screen(&screen, store.current().is_some());
        }
        Command::Watchlist { action } => {
            return run_collection(&account, &store, MembershipKind::Watchlist, action).await;
        }
        Command::Favorites { action } => {
            return run_collection(&account, &store, MembershipKind::Favorite, action).await;
        }
        Command::Review {
            movie_id,
            rating,
            text,
        } => {
            let mut screen = DetailScreen::open(movie_id);
            screen.draft_mut().set_rating(rating);
            screen.draft_mut().set_text(text);
            match screen.submit_review(&account, store.current()).await? {
                ReviewOutcome::Submitted => {
                    println!(
                        "review submitted for movie {movie_id} (rating {})",
                        screen.reviews().last().map_or(rating, |r| r.rating)
                    );
                }
                ReviewOutcome::AuthRequired => return Ok(auth_required()),
            }
        }
        // Handled before the client was built.
        Command::Config { .. } => {}
    }

    Ok(ExitCode::SUCCESS)
}

/// Show the stored configuration, or validate and persist a change.
fn run_config(mut config: AppConfig, action: &ConfigAction) -> Result<ExitCode, CoreError> {
    match action {
        ConfigAction::Show => {
            println!("server: {}", config.server.base_url);
            println!("timeout: {}s", config.server.timeout_secs);
            println!("file: {}", AppConfig::config_path().display());
        }
        ConfigAction::SetServer { url } => {
            let parsed =
                Url::parse(url).map_err(|e| CoreError::Config(format!("bad server URL: {e}")))?;
            config.server.base_url = parsed.to_string();
            config.save()?;
            println!("server set to {}", config.server.base_url);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// List or toggle one of the two membership collections.
async fn run_collection(
    account: &AccountClient,
    store: &SessionStore,
    kind: MembershipKind,
    action: Option<ListAction>,
) -> Result<ExitCode, CoreError> {
    let viewer = store.current();
    match action {
        None => {
            if viewer.is_none() {
                return Ok(auth_required());
            }
            let fetched = match kind {
                MembershipKind::Watchlist => account.watchlist().await,
                MembershipKind::Favorite => account.favorites().await,
            };
            match fetched {
                Ok(entries) => {
                    if entries.is_empty() {
                        println!("your {kind} collection is empty");
                    } else {
                        print_movies(&entries.into_iter().map(|e| e.movie).collect::<Vec<_>>());
                    }
                }
                Err(e) if e.is_auth() => return Ok(auth_required()),
                Err(e) => return Err(e.into()),
            }
        }
        Some(ListAction::Toggle { movie_id }) => {
            let flags = resolve_membership(account, movie_id, viewer).await;
            let current = match kind {
                MembershipKind::Watchlist => flags.in_watchlist,
                MembershipKind::Favorite => flags.is_favorited,
            };
            let controller = ToggleController::new();
            let outcome = controller
                .toggle(account, kind, movie_id, current, viewer)
                .await?;
            match outcome {
                ToggleOutcome::Applied { member: true } => {
                    println!("movie {movie_id} added to your {kind} collection");
                }
                ToggleOutcome::Applied { member: false } => {
                    println!("movie {movie_id} removed from your {kind} collection");
                }
                ToggleOutcome::AuthRequired => return Ok(auth_required()),
                ToggleOutcome::InFlight => {
                    println!("an update for movie {movie_id} is still pending");
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn auth_required() -> ExitCode {
    eprintln!("please sign in first: marquee login <username> <password>");
    ExitCode::FAILURE
}

fn print_movies(movies: &[Movie]) {
    if movies.is_empty() {
        println!("nothing found");
        return;
    }
    for movie in movies {
        let year = movie
            .release_date
            .as_deref()
            .map(|d| format!(" ({})", d.get(..4).unwrap_or(d)))
            .unwrap_or_default();
        let rating = movie
            .rating
            .map(|r| format!("  [{r:.1}]"))
            .unwrap_or_default();
        println!("{:>6}  {}{}{}", movie.id, movie.title, year, rating);
    }
}

fn print_screen(screen: &DetailScreen, signed_in: bool) {
    if screen.phase() != ScreenPhase::Ready {
        println!("movie {} could not be loaded", screen.movie_id());
        return;
    }
    let Some(movie) = screen.movie() else {
        return;
    };

    let year = movie
        .release_date
        .as_deref()
        .map(|d| format!(" ({})", d.get(..4).unwrap_or(d)))
        .unwrap_or_default();
    println!("#{}  {}{}", movie.id, movie.title, year);
    if let Some(rating) = movie.rating {
        println!("  rating: {rating:.1}");
    }
    if !movie.genres.is_empty() {
        println!("  genres: {}", movie.genres.join(", "));
    }
    if !movie.cast.is_empty() {
        println!("  cast: {}", movie.cast.join(", "));
    }
    if let Some(description) = &movie.description {
        println!("\n  {description}");
    }

    if signed_in {
        let flags = screen.membership();
        println!(
            "\n  in watchlist: {}   favorited: {}",
            yes_no(flags.in_watchlist),
            yes_no(flags.is_favorited)
        );
    }

    if screen.partial_data() {
        println!("\n  reviews are unavailable right now");
    } else if screen.reviews().is_empty() {
        println!("\n  no reviews yet");
    } else {
        println!("\n  reviews ({}):", screen.reviews().len());
        for review in screen.reviews() {
            print_review(review);
        }
    }
}

fn print_review(review: &Review) {
    let author = review
        .user
        .as_ref()
        .map(|u| u.username.as_str())
        .unwrap_or("anonymous");
    if review.text.is_empty() {
        println!("    {:>4.1}  {author}", review.rating);
    } else {
        println!("    {:>4.1}  {author}: {}", review.rating, review.text);
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
