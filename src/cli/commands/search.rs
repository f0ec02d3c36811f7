use crate::config::Config;
use crate::state::remote_metadata;

pub async fn cmd_search(config: &Config, query: &str) -> anyhow::Result<()> {
    println!("Searching for: {query}");

    let metadata = remote_metadata(config)?;
    let results = metadata.search(query, 1).await;

    if results.is_empty() {
        println!("No title found matching '{query}'");
        return Ok(());
    }

    println!();
    println!("Search Results:");
    println!("{:-<60}", "");

    for movie in results.iter().take(10) {
        let kind = movie.content_type.map_or("?", |t| t.as_str());

        println!("• {} ({})", movie.title, movie.year);
        println!(
            "  Type: {} | ID: {} | Rating: {}",
            kind, movie.id, movie.rating
        );
        println!();
    }

    println!("To import a title: planetstream import tmdb <id> --kind <movie|tv> --save");

    Ok(())
}
