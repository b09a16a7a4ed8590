use super::{spinner, AppContext};
use crate::output::{movie_table, Output};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use moodreel_core::{SearchOptions, SearchPhase, SearchPipeline, SearchState};
use owo_colors::OwoColorize;
use serde_json::json;
use std::io::BufRead;
use tokio::sync::mpsc;

fn phase_name(phase: SearchPhase) -> &'static str {
    match phase {
        SearchPhase::Idle => "idle",
        SearchPhase::Debouncing => "debouncing",
        SearchPhase::Loading => "loading",
        SearchPhase::Success => "success",
        SearchPhase::Failed => "failed",
    }
}

fn is_settled(state: &SearchState) -> bool {
    matches!(state.phase, SearchPhase::Success | SearchPhase::Failed)
}

fn pipeline(ctx: &AppContext) -> Result<SearchPipeline> {
    let options = SearchOptions {
        debounce: ctx.config.search.debounce(),
    };
    Ok(SearchPipeline::new(ctx.catalog()?, options))
}

pub async fn run_search(ctx: &AppContext, query: String, output: &Output) -> Result<()> {
    if query.trim().is_empty() {
        output.warn("Nothing to search for");
        return Ok(());
    }

    let search = pipeline(ctx)?;
    let mut rx = search.subscribe();

    let pb = spinner(output, &format!("Searching for \"{}\"...", query));
    search.input(&query);
    let state = rx
        .wait_for(is_settled)
        .await
        .map_err(|_| eyre!("Search pipeline closed before a result arrived"))?
        .clone();
    pb.finish_and_clear();
    search.shutdown();

    if let Some(message) = state.error {
        return Err(eyre!(message));
    }
    print_state(&state, output);
    Ok(())
}

/// Each stdin line replaces the search box contents; an empty line clears it.
pub async fn run_interactive(ctx: &AppContext, output: &Output) -> Result<()> {
    let search = pipeline(ctx)?;
    let mut rx = search.subscribe();

    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    if output.is_human() && !output.is_quiet() {
        println!("{}", "Type a title and press Enter. Ctrl-D to quit.".bright_black());
    }

    let mut stdin_open = true;
    loop {
        tokio::select! {
            line = line_rx.recv(), if stdin_open => match line {
                Some(line) => search.input(&line),
                None => {
                    stdin_open = false;
                    if !rx.borrow().is_loading() {
                        break;
                    }
                }
            },
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                print_state(&state, output);
                if !stdin_open && !state.is_loading() {
                    break;
                }
            }
        }
    }

    search.shutdown();
    Ok(())
}

fn print_state(state: &SearchState, output: &Output) {
    if !output.is_human() {
        output.json(&json!({
            "phase": phase_name(state.phase),
            "query": state.query,
            "results": state.results,
            "error": state.error,
        }));
        return;
    }
    if output.is_quiet() {
        return;
    }

    match state.phase {
        SearchPhase::Idle => println!("{}", "(cleared)".bright_black()),
        SearchPhase::Debouncing => {}
        SearchPhase::Loading => println!("{} {}", "…".cyan(), format!("Searching for \"{}\"", state.query).bright_black()),
        SearchPhase::Failed => {
            output.error(state.error.as_deref().unwrap_or_default());
        }
        SearchPhase::Success if state.is_empty_result() => {
            output.info(format!("No movies found for \"{}\"", state.query));
        }
        SearchPhase::Success => {
            println!("\n{}", format!("Results for \"{}\"", state.query).bright_cyan().bold());
            output.table(&movie_table(&state.results));
        }
    }
}
