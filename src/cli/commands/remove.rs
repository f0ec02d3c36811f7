use crate::config::Config;
use crate::services::ContentError;
use crate::state::SharedState;

pub async fn cmd_remove_title(config: &Config, id: &str, yes: bool) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let movie = match state.content.get(id).await {
        Ok(movie) => movie,
        Err(ContentError::NotFound(_)) => {
            println!("Title with ID {id} not found.");
            println!("Use 'planetstream list' to see title IDs.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if !yes {
        println!("Remove '{}' (ID: {})?", movie.title, movie.id);
        println!("Enter 'y' to confirm, anything else to cancel:");

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let removed = state.content.remove(id).await?;
    println!("✓ Removed: {} ({removed} record(s))", movie.title);

    Ok(())
}
