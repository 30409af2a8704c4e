//! Posts command handler.

use anyhow::Result;
use feedr_core::session::SessionStore;

pub async fn list(session: &SessionStore, page_size: u32) -> Result<()> {
    let posts = session.api().posts(page_size).await?;

    if posts.is_empty() {
        println!("No posts found.");
        return Ok(());
    }

    for post in posts {
        if post.name.is_empty() {
            println!("{}", post.title);
        } else {
            println!("{} — {}", post.title, post.name);
        }
        println!("  {}", post.url);
    }

    Ok(())
}
