use super::{spinner, AppContext};
use crate::output::{movie_table, Output};
use crate::WatchlistCommands;
use color_eyre::eyre::Context;
use color_eyre::Result;
use moodreel_core::{MovieDetailsView, WatchlistAction, WatchlistStore};
use moodreel_models::MovieId;
use serde_json::json;

pub async fn run_watchlist(ctx: &AppContext, cmd: WatchlistCommands, output: &Output) -> Result<()> {
    let store = ctx.watchlist()?;
    if !store.is_durable() {
        tracing::debug!("Watchlist storage is not durable; changes last for this run only");
    }

    match cmd {
        WatchlistCommands::List => list(&store, output),
        WatchlistCommands::Count => {
            if output.is_human() {
                output.info(store.len().to_string());
            } else {
                output.json(&json!({ "count": store.len() }));
            }
            Ok(())
        }
        WatchlistCommands::Add { movie_id } => {
            if store.contains(movie_id) {
                output.info(format!("Movie {} is already in your watchlist", movie_id));
                return Ok(());
            }
            let action = toggle(ctx, &store, movie_id, output).await?;
            report(action, &store, output);
            Ok(())
        }
        WatchlistCommands::Remove { movie_id } => {
            let removed = store.remove(movie_id).wrap_err("Failed to update watchlist")?;
            if removed {
                report(WatchlistAction::Removed, &store, output);
            } else {
                output.warn(format!("Movie {} is not in your watchlist", movie_id));
            }
            Ok(())
        }
        WatchlistCommands::Toggle { movie_id } => {
            let action = if store.contains(movie_id) {
                store.remove(movie_id).wrap_err("Failed to update watchlist")?;
                WatchlistAction::Removed
            } else {
                toggle(ctx, &store, movie_id, output).await?
            };
            report(action, &store, output);
            Ok(())
        }
        WatchlistCommands::Clear => {
            store.clear().wrap_err("Failed to clear watchlist")?;
            output.success("Watchlist cleared");
            Ok(())
        }
    }
}

/// Saving needs the movie summary, so fetch it first.
async fn toggle(ctx: &AppContext, store: &WatchlistStore, movie_id: MovieId, output: &Output) -> Result<WatchlistAction> {
    let catalog = ctx.catalog()?;
    let pb = spinner(output, "Loading movie...");
    let result = MovieDetailsView::load(catalog.as_ref(), store, movie_id).await;
    pb.finish_and_clear();
    let mut view = result?;
    let action = view.toggle_watchlist(store).wrap_err("Failed to update watchlist")?;
    tracing::info!(movie_id, title = %view.details.movie.title, ?action, "Watchlist updated");
    Ok(action)
}

fn report(action: WatchlistAction, store: &WatchlistStore, output: &Output) {
    let verb = match action {
        WatchlistAction::Added => "Added to",
        WatchlistAction::Removed => "Removed from",
    };
    output.success(format!("{} watchlist ({} saved)", verb, store.len()));
}

fn list(store: &WatchlistStore, output: &Output) -> Result<()> {
    let movies = store.current();
    if !output.is_human() {
        output.json(&json!({ "count": movies.len(), "movies": movies }));
        return Ok(());
    }
    if movies.is_empty() {
        output.info("Your watchlist is empty. Add movies from `moodreel details <id>` or `moodreel watchlist add <id>`.");
        return Ok(());
    }
    output.table(&movie_table(&movies));
    Ok(())
}
