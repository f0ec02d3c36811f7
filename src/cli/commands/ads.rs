use crate::config::Config;
use crate::models::settings::AD_ZONES;
use crate::services::ads::{render_html, resolve_zone};
use crate::services::{AdSlot, Viewport};
use crate::state::SharedState;

pub async fn cmd_ads(config: &Config, zone: Option<&str>, mobile: bool) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let ads = state.settings.ads().await?;
    let viewport = if mobile {
        Viewport::Mobile
    } else {
        Viewport::Desktop
    };

    if let Some(zone) = zone {
        println!("{}", render_html(&resolve_zone(zone, &ads, viewport)));
        return Ok(());
    }

    println!("Ad Zones ({viewport:?})");
    println!("{:-<60}", "");

    for zone in AD_ZONES {
        let summary = match resolve_zone(zone, &ads, viewport) {
            AdSlot::Hidden => "hidden".to_string(),
            AdSlot::Placeholder { width, height, .. } => format!("placeholder {width}x{height}"),
            AdSlot::Markup { html } => format!("markup ({} bytes)", html.len()),
        };
        println!("{zone:<24} {summary}");
    }

    Ok(())
}
