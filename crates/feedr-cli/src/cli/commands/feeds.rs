//! Feed command handlers.

use anyhow::Result;
use feedr_core::session::SessionStore;

pub async fn add(session: &SessionStore, url: &str) -> Result<()> {
    let ack = session.api().add_feed(url).await?;

    println!("✓ Feed registered: {url}");
    if let Some(name) = ack.get("name").and_then(|v| v.as_str()) {
        println!("  {name}");
    }

    Ok(())
}

pub async fn list(session: &SessionStore, page_size: u32) -> Result<()> {
    let feeds = session.api().feeds(page_size).await?;

    if feeds.is_empty() {
        println!("No feeds found.");
        return Ok(());
    }

    for feed in feeds {
        println!("{} ({})", feed.name, feed.id);
        println!("  {}", feed.url);
    }

    Ok(())
}
