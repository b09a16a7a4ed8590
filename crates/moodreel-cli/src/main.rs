use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::Context;
use commands::{browse, config, details, search, watchlist, AppContext};
use moodreel_models::{Mood, MovieId};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "moodreel")]
#[command(about = "MoodReel - Find a movie that fits your mood")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List popular movies
    Popular {
        /// Page number (starts at 1)
        #[arg(long)]
        page: Option<u32>,
    },
    /// Discover movies for a mood
    #[command(long_about = "Discover movies matching a mood. Moods map to genre filters: feel-good (Comedy, Family), action-fix (Action, Adventure), mind-benders (Mystery, Thriller).")]
    Mood {
        /// feel-good, action-fix or mind-benders
        mood: Mood,

        /// Page number (starts at 1)
        #[arg(long)]
        page: Option<u32>,
    },
    /// Search movies by title
    #[command(long_about = "Search movies by title. With --interactive, every line read from stdin is treated as the current contents of the search box: lines typed in quick succession are debounced into a single request and only the latest request's results are shown.")]
    Search {
        /// Query text (omit with --interactive)
        #[arg(required_unless_present = "interactive")]
        query: Option<String>,

        /// Read successive search box values from stdin
        #[arg(long, short, action = ArgAction::SetTrue, conflicts_with = "query")]
        interactive: bool,
    },
    /// Show full details for a movie
    Details {
        movie_id: MovieId,
    },
    /// List movies similar to the given one
    Similar {
        movie_id: MovieId,
    },
    /// Manage the saved watchlist
    Watchlist {
        #[command(subcommand)]
        cmd: Option<WatchlistCommands>,
    },
    /// Configure the API key and settings
    #[command(long_about = "Manage configuration and credentials for MoodReel. The TMDB API key is stored in the credentials file; the TMDB_API_KEY environment variable takes precedence over it.")]
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum WatchlistCommands {
    /// List saved movies (default)
    List,
    /// Fetch a movie and save it
    Add { movie_id: MovieId },
    /// Remove a saved movie
    Remove { movie_id: MovieId },
    /// Save the movie if absent, remove it otherwise
    Toggle { movie_id: MovieId },
    /// Remove every saved movie
    Clear,
    /// Print how many movies are saved
    Count,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Store the TMDB API key
    ApiKey {
        /// API key (if not provided, will prompt)
        #[arg(long)]
        key: Option<String>,
    },
    /// Print configuration and data locations
    Path,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let ctx = AppContext::load().wrap_err("Failed to load configuration")?;

    logging::init_logging(cli.verbose, cli.quiet, &ctx.config.logging)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Popular { page } => browse::run_feed(&ctx, None, page, &output).await,
        Commands::Mood { mood, page } => browse::run_feed(&ctx, Some(mood), page, &output).await,
        Commands::Search { query, interactive } => {
            if interactive {
                search::run_interactive(&ctx, &output).await
            } else {
                search::run_search(&ctx, query.unwrap_or_default(), &output).await
            }
        }
        Commands::Details { movie_id } => details::run_details(&ctx, movie_id, &output).await,
        Commands::Similar { movie_id } => details::run_similar(&ctx, movie_id, &output).await,
        Commands::Watchlist { cmd } => {
            let cmd = cmd.unwrap_or(WatchlistCommands::List);
            watchlist::run_watchlist(&ctx, cmd, &output).await
        }
        Commands::Config { cmd } => config::run_config(&ctx, cmd, &output),
    }
}
