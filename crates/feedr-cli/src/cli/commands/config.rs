//! Config command handlers.

use anyhow::{Context, Result};
use feedr_core::config::{Config, default_config_template, paths};
use url::Url;

pub fn path() -> Result<()> {
    println!("{}", paths::config_path().display());
    Ok(())
}

pub fn init() -> Result<()> {
    let path = paths::config_path();
    if path.exists() {
        anyhow::bail!("Config already exists at {}", path.display());
    }

    Config::write_config(&path, default_config_template())?;
    println!("Created config at {}", path.display());

    Ok(())
}

pub fn set_url(url: &str) -> Result<()> {
    let parsed = Url::parse(url).with_context(|| format!("Invalid URL: {url}"))?;

    Config::save_api_url(parsed.as_str())?;
    println!("Set api_url to {parsed}");

    Ok(())
}
