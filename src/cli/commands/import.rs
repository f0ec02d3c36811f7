use anyhow::bail;

use crate::clients::tmdb::MediaKind;
use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_import(
    config: &Config,
    source: &str,
    id: &str,
    kind: &str,
    save: bool,
) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let draft = match source.to_lowercase().as_str() {
        "tmdb" => {
            let Some(kind) = MediaKind::parse(kind) else {
                bail!("Unknown TMDB kind: {kind} (use movie or tv)");
            };
            state.content.import_tmdb(kind, id).await?
        }
        "mal" | "myanimelist" => {
            let Ok(mal_id) = id.parse::<i64>() else {
                bail!("Invalid MyAnimeList id: {id}");
            };
            state.content.import_mal(mal_id).await?
        }
        other => bail!("Unknown source: {other} (use tmdb or mal)"),
    };

    println!("Imported Draft");
    println!("{:-<60}", "");
    println!("Title:    {}", draft.title);
    println!("Year:     {}", draft.year);
    println!(
        "Type:     {}",
        draft.content_type.map_or("?", |t| t.as_str())
    );
    println!("Genres:   {}", draft.genre.join(", "));
    println!("Seasons:  {}", draft.seasons.len());
    if let Some(total) = &draft.total_episodes_count {
        println!("Episodes: {total}");
    }

    if save {
        let saved = state.content.upsert(draft).await?;
        println!();
        println!("✓ Saved as managed title {}", saved.id);
    } else {
        println!();
        println!("Draft only. Re-run with --save to store it.");
    }

    Ok(())
}
