//! List managed titles command handler

use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_list_titles(config: &Config, pinned_only: bool) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let titles: Vec<_> = state
        .content
        .list()
        .await?
        .into_iter()
        .filter(|m| !pinned_only || m.is_pinned)
        .collect();

    if titles.is_empty() {
        println!("No managed titles.");
        println!();
        println!("Import one with: planetstream import tmdb <id> --save");
        return Ok(());
    }

    println!("Managed Titles ({} total)", titles.len());
    println!("{:-<70}", "");

    for movie in titles {
        let kind = movie.content_type.map_or("?", |t| t.as_str());
        let marker = if movie.is_pinned { "📌" } else { "•" };
        let episodes: usize = movie.seasons.iter().map(|s| s.episodes.len()).sum();

        println!("{} {} ({}) [{}]", marker, movie.title, movie.year, kind);
        println!(
            "  ID: {} | Seasons: {} | Episodes: {} | Status: {}",
            movie.id,
            movie.seasons.len(),
            episodes,
            movie.status.as_deref().unwrap_or("Publish")
        );
    }

    println!();
    println!("Legend: 📌 Pinned");

    Ok(())
}
