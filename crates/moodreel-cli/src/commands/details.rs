use super::{spinner, AppContext};
use crate::output::{movie_table, styled_table, Output};
use color_eyre::eyre::Context;
use color_eyre::Result;
use comfy_table::Cell;
use moodreel_catalog::MovieCatalog;
use moodreel_core::MovieDetailsView;
use moodreel_models::MovieId;
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_details(ctx: &AppContext, movie_id: MovieId, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let watchlist = ctx.watchlist()?;
    let images = ctx.images();

    let pb = spinner(output, "Loading movie details...");
    let result = MovieDetailsView::load(catalog.as_ref(), &watchlist, movie_id).await;
    pb.finish_and_clear();
    let view = result?;
    let details = &view.details;
    let movie = &details.movie;

    if !output.is_human() {
        output.json(&json!({
            "movie": details,
            "poster_url": images.poster(movie.poster_path.as_deref()),
            "backdrop_url": images.backdrop(movie.backdrop_path.as_deref()),
            "trailer_url": view.trailer_url(),
            "cast": view.cast().iter().map(|c| json!({
                "name": c.name,
                "character": c.character,
                "profile_url": images.profile(c.profile_path.as_deref()),
            })).collect::<Vec<_>>(),
            "similar": view.similar,
            "in_watchlist": view.in_watchlist,
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    println!("\n{} {}", movie.title.bright_cyan().bold(), format!("({})", movie.year()).bright_black());
    if !details.tagline.is_empty() {
        println!("{}", details.tagline.italic());
    }
    println!();

    let mut info = styled_table();
    info.add_row(vec![Cell::new("Rating"), Cell::new(format!("⭐ {:.1} ({} votes)", movie.vote_average, movie.vote_count))]);
    if let Some(runtime) = details.runtime {
        info.add_row(vec![Cell::new("Runtime"), Cell::new(format!("{} min", runtime))]);
    }
    if !details.status.is_empty() {
        info.add_row(vec![Cell::new("Status"), Cell::new(&details.status)]);
    }
    if !details.genres.is_empty() {
        info.add_row(vec![Cell::new("Genres"), Cell::new(details.genre_names().join(", "))]);
    }
    let directors: Vec<&str> = details.directors().map(|d| d.name.as_str()).collect();
    if !directors.is_empty() {
        info.add_row(vec![Cell::new("Director"), Cell::new(directors.join(", "))]);
    }
    info.add_row(vec![Cell::new("Poster"), Cell::new(images.poster(movie.poster_path.as_deref()))]);
    info.add_row(vec![Cell::new("Backdrop"), Cell::new(images.backdrop(movie.backdrop_path.as_deref()))]);
    if let Some(url) = view.trailer_url() {
        info.add_row(vec![Cell::new("Trailer"), Cell::new(url)]);
    }
    info.add_row(vec![
        Cell::new("Watchlist"),
        Cell::new(if view.in_watchlist { "✓".green().to_string() } else { "✗".red().to_string() }),
    ]);
    output.table(&info);

    if !movie.overview.is_empty() {
        println!("\n{}", movie.overview);
    }

    if !view.cast().is_empty() {
        println!("\n{}", "Cast".bold());
        let mut cast = styled_table();
        cast.set_header(vec!["Name", "Character", "Profile"]);
        for member in view.cast() {
            cast.add_row(vec![
                Cell::new(&member.name),
                Cell::new(&member.character),
                Cell::new(images.profile(member.profile_path.as_deref())),
            ]);
        }
        output.table(&cast);
    }

    if !view.similar.is_empty() {
        println!("\n{}", "Similar Movies".bold());
        output.table(&movie_table(&view.similar));
    }

    Ok(())
}

pub async fn run_similar(ctx: &AppContext, movie_id: MovieId, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;

    let pb = spinner(output, "Loading similar movies...");
    let result = catalog.fetch_similar(movie_id).await;
    pb.finish_and_clear();
    let page = result.wrap_err(moodreel_core::messages::LOAD_SIMILAR_FAILED)?;

    if !output.is_human() {
        output.json(&json!({
            "movie_id": movie_id,
            "results": page.results,
        }));
    } else if page.results.is_empty() {
        output.info("No similar movies found.");
    } else {
        output.table(&movie_table(&page.results));
    }
    Ok(())
}
