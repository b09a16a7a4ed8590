use super::{spinner, AppContext};
use crate::output::{movie_table, Output};
use color_eyre::Result;
use moodreel_core::load_feed;
use moodreel_models::Mood;
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_feed(ctx: &AppContext, mood: Option<Mood>, page: Option<u32>, output: &Output) -> Result<()> {
    tracing::debug!(mood = ?mood.map(|m| m.key()), ?page, "Feed command started");
    let catalog = ctx.catalog()?;

    let pb = spinner(output, "Loading movies...");
    let result = load_feed(catalog.as_ref(), mood, page).await;
    pb.finish_and_clear();

    let feed = result?;

    if output.is_human() {
        if output.is_quiet() {
            return Ok(());
        }
        println!("\n{}", feed.title.bright_cyan().bold());
        if feed.page.results.is_empty() {
            output.info("No movies found.");
            return Ok(());
        }
        output.table(&movie_table(&feed.page.results));
        println!(
            "{}",
            format!("Page {} of {}", feed.page.page, feed.page.total_pages).bright_black()
        );
    } else {
        output.json(&json!({
            "title": feed.title,
            "mood": feed.mood.map(|m| m.key()),
            "page": feed.page.page,
            "total_pages": feed.page.total_pages,
            "total_results": feed.page.total_results,
            "results": feed.page.results,
        }));
    }

    Ok(())
}
