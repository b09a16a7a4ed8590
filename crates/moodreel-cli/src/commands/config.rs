use super::AppContext;
use crate::output::{mask_string, styled_table, Output};
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::Cell;
use moodreel_config::{CredentialStore, TMDB_API_KEY_ENV};
use serde_json::json;

pub fn run_config(ctx: &AppContext, cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(ctx, full, output),
        ConfigCommands::ApiKey { key } => configure_api_key(ctx, key, output),
        ConfigCommands::Path => show_paths(ctx, output),
    }
}

fn api_key_source(ctx: &AppContext) -> (&'static str, String) {
    match std::env::var(TMDB_API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()) {
        Some(key) => ("environment", key),
        None => match ctx.credentials.get_tmdb_api_key() {
            Some(key) => ("credentials file", key.clone()),
            None => ("not set", String::new()),
        },
    }
}

fn show_config(ctx: &AppContext, full: bool, output: &Output) -> Result<()> {
    let config = &ctx.config;
    let (key_source, key) = api_key_source(ctx);
    let key_display = if full { key } else { mask_string(&key) };
    let log_file = config
        .logging
        .file
        .as_ref()
        .map(|p| p.display().to_string());

    if !output.is_human() {
        output.json(&json!({
            "config_file": ctx.paths.config_file().display().to_string(),
            "tmdb": {
                "api_url": config.tmdb.api_url,
                "image_url": config.tmdb.image_url,
                "api_key": key_display,
                "api_key_source": key_source,
            },
            "search": { "debounce_ms": config.search.debounce_ms },
            "storage": { "backend": config.storage.backend },
            "logging": {
                "level": config.logging.level,
                "json": config.logging.json,
                "file": log_file,
            },
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    if !ctx.paths.config_file().exists() {
        output.warn(format!(
            "No configuration file at {}; showing defaults",
            ctx.paths.config_file().display()
        ));
    }

    let mut table = styled_table();
    table.set_header(vec![
        Cell::new("Setting").fg(comfy_table::Color::Cyan).add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Value").fg(comfy_table::Color::Cyan).add_attribute(comfy_table::Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("API URL"), Cell::new(&config.tmdb.api_url)]);
    table.add_row(vec![Cell::new("Image URL"), Cell::new(&config.tmdb.image_url)]);
    table.add_row(vec![Cell::new("API Key"), Cell::new(format!("{} ({})", key_display, key_source))]);
    table.add_row(vec![Cell::new("Search Debounce"), Cell::new(format!("{} ms", config.search.debounce_ms))]);
    table.add_row(vec![Cell::new("Storage"), Cell::new(format!("{:?}", config.storage.backend).to_lowercase())]);
    table.add_row(vec![Cell::new("Log Level"), Cell::new(&config.logging.level)]);
    table.add_row(vec![Cell::new("Log File"), Cell::new(log_file.unwrap_or_else(|| "stderr".to_string()))]);
    output.table(&table);
    Ok(())
}

fn configure_api_key(ctx: &AppContext, key: Option<String>, output: &Output) -> Result<()> {
    let key = match key {
        Some(key) => key,
        None => rpassword::prompt_password("TMDB API key: ")
            .map_err(|e| eyre!("Failed to read API key: {}", e))?,
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(eyre!("API key cannot be empty"));
    }

    let credentials_file = ctx.paths.credentials_file();
    let mut store = CredentialStore::new(credentials_file.clone());
    store
        .load()
        .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;
    store.set_tmdb_api_key(key);
    store
        .save()
        .map_err(|e| eyre!("Failed to save credentials to {}: {}", credentials_file.display(), e))?;

    tracing::info!(path = %credentials_file.display(), "TMDB API key saved");
    output.success(format!("API key saved to {}", credentials_file.display()));
    if std::env::var(TMDB_API_KEY_ENV).is_ok() {
        output.warn(format!("{} is set and takes precedence over the saved key", TMDB_API_KEY_ENV));
    }
    Ok(())
}

fn show_paths(ctx: &AppContext, output: &Output) -> Result<()> {
    let paths = &ctx.paths;
    let entries = [
        ("config_file", paths.config_file()),
        ("credentials_file", paths.credentials_file()),
        ("storage_dir", paths.storage_dir()),
        ("log_dir", paths.log_dir().to_path_buf()),
    ];

    if !output.is_human() {
        let map: serde_json::Map<String, serde_json::Value> = entries
            .iter()
            .map(|(name, path)| (name.to_string(), json!(path.display().to_string())))
            .collect();
        output.json(&serde_json::Value::Object(map));
        return Ok(());
    }
    for (name, path) in &entries {
        output.info(format!("{:<18} {}", name, path.display()));
    }
    Ok(())
}
