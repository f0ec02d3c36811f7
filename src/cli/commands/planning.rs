use anyhow::bail;
use chrono::Local;

use crate::config::Config;
use crate::services::planning::PlanningMode;
use crate::services::{PlanningFilter, PlanningProjector};
use crate::state::SharedState;

pub async fn cmd_planning(
    config: &Config,
    filter: &str,
    week: i64,
    search: Option<&str>,
) -> anyhow::Result<()> {
    let Some(filter) = PlanningFilter::parse(filter) else {
        bail!("Unknown filter: {filter} (use TOUS, ANIMES, FILMS, VOSTFR or VF)");
    };

    let state = SharedState::new(config.clone()).await?;
    let managed = state.content.list().await?;

    let projector = PlanningProjector::new(
        Local::now().date_naive(),
        config.planning.fallback_total_episodes,
    );
    let Some(board) = projector.board(&managed, week, filter, search) else {
        bail!("Week offset out of range: {week}");
    };

    match (board.mode, board.week_start) {
        (PlanningMode::Weekly, Some(start)) => println!("Week of {}", start.format("%d/%m/%Y")),
        _ => println!("Monthly releases"),
    }
    println!("{:-<60}", "");

    for column in &board.columns {
        let marker = if column.is_current { " ◀" } else { "" };
        match column.date {
            Some(date) => println!("{} {}{}", column.name, date.format("%d/%m"), marker),
            None => println!("{}{}", column.name, marker),
        }

        if column.items.is_empty() {
            println!("  -");
        }

        for item in &column.items {
            let episode = item
                .episode_number
                .map(|n| format!(" · Épisode {n}"))
                .unwrap_or_default();
            println!(
                "  {} {} [{}]{}",
                item.entry.time(),
                item.movie.title,
                item.entry.language(),
                episode
            );
        }
    }

    Ok(())
}
