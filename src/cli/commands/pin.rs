use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_pin(config: &Config, id: &str) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let movie = state.content.toggle_pin(id).await?;

    if movie.is_pinned {
        println!("📌 Pinned: {}", movie.title);
    } else {
        println!("Unpinned: {}", movie.title);
    }

    Ok(())
}
