use serde::Serialize;

use crate::constants::placeholders::{BANNER_IMAGE, MOBILE_IMAGE, PLAYER_INSIDE_IMAGE, SIDEBAR_IMAGE};
use crate::models::settings::{AdZoneConfig, AdsConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    Desktop,
    Mobile,
}

impl Viewport {
    #[must_use]
    pub const fn from_width(width: u32, breakpoint: u32) -> Self {
        if width < breakpoint {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "desktop" => Some(Self::Desktop),
            "mobile" => Some(Self::Mobile),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AdSlot {
    Hidden,
    #[serde(rename_all = "camelCase")]
    Placeholder {
        width: u32,
        height: u32,
        image_url: &'static str,
        label: String,
    },
    Markup {
        html: String,
    },
}

/// "headerBottom" becomes "header Bottom".
#[must_use]
pub fn zone_label(zone: &str) -> String {
    let mut label = String::with_capacity(zone.len() + 4);
    for c in zone.chars() {
        if c.is_ascii_uppercase() {
            label.push(' ');
        }
        label.push(c);
    }
    label.trim().to_string()
}

fn placeholder(zone: &str, viewport: Viewport) -> AdSlot {
    let lowered = zone.to_lowercase();

    let (width, height, image_url) = if lowered.contains("sidebar") {
        (160, 600, SIDEBAR_IMAGE)
    } else if lowered.contains("playerinside") {
        (300, 250, PLAYER_INSIDE_IMAGE)
    } else if viewport == Viewport::Mobile {
        (320, 50, MOBILE_IMAGE)
    } else {
        (728, 90, BANNER_IMAGE)
    };

    AdSlot::Placeholder {
        width,
        height,
        image_url,
        label: zone_label(zone),
    }
}

#[must_use]
pub fn resolve_zone(zone: &str, config: &AdsConfig, viewport: Viewport) -> AdSlot {
    let fallback = AdZoneConfig::default();
    let zone_config = config.zone(zone).unwrap_or(&fallback);

    if !zone_config.enabled {
        return AdSlot::Hidden;
    }

    let payload = match viewport {
        Viewport::Desktop => &zone_config.desktop,
        Viewport::Mobile => &zone_config.mobile,
    };

    if payload.is_empty() {
        placeholder(zone, viewport)
    } else {
        AdSlot::Markup {
            html: payload.clone(),
        }
    }
}

/// HTML fragment for a resolved slot. Admin markup is emitted as-is.
#[must_use]
pub fn render_html(slot: &AdSlot) -> String {
    match slot {
        AdSlot::Hidden => String::new(),
        AdSlot::Markup { html } => {
            format!(r#"<div class="ad-slot">{html}</div>"#)
        }
        AdSlot::Placeholder {
            width,
            height,
            image_url,
            label,
        } => format!(
            concat!(
                r#"<div class="ad-slot ad-placeholder" style="width:{w}px;height:{h}px">"#,
                r#"<img src="{img}" alt="placeholder">"#,
                r#"<p>Espace Publicitaire</p><p>{label}</p></div>"#
            ),
            w = width,
            h = height,
            img = html_escape::encode_double_quoted_attribute(image_url),
            label = html_escape::encode_text(label),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(zone: &str, desktop: &str, mobile: &str, enabled: bool) -> AdsConfig {
        let mut ads = AdsConfig::default();
        *ads.zone_mut(zone) = AdZoneConfig {
            desktop: desktop.to_string(),
            mobile: mobile.to_string(),
            enabled,
        };
        ads
    }

    #[test]
    fn test_viewport_breakpoint() {
        assert_eq!(Viewport::from_width(767, 768), Viewport::Mobile);
        assert_eq!(Viewport::from_width(768, 768), Viewport::Desktop);
    }

    #[test]
    fn test_disabled_zone_is_hidden() {
        let ads = config("headerBottom", "<b>ad</b>", "", false);
        assert_eq!(resolve_zone("headerBottom", &ads, Viewport::Desktop), AdSlot::Hidden);
        assert_eq!(render_html(&AdSlot::Hidden), "");
    }

    #[test]
    fn test_markup_per_viewport() {
        let ads = config("headerBottom", "<b>desk</b>", "", true);
        assert_eq!(
            resolve_zone("headerBottom", &ads, Viewport::Desktop),
            AdSlot::Markup {
                html: "<b>desk</b>".to_string()
            }
        );

        match resolve_zone("headerBottom", &ads, Viewport::Mobile) {
            AdSlot::Placeholder { width, height, .. } => assert_eq!((width, height), (320, 50)),
            other => panic!("expected placeholder, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_zone_gets_placeholder_sizes() {
        let ads = AdsConfig::default();
        let size = |zone: &str, viewport| match resolve_zone(zone, &ads, viewport) {
            AdSlot::Placeholder { width, height, .. } => (width, height),
            other => panic!("expected placeholder, got {other:?}"),
        };

        assert_eq!(size("sidebarLeft", Viewport::Mobile), (160, 600));
        assert_eq!(size("playerInside", Viewport::Desktop), (300, 250));
        assert_eq!(size("footerTop", Viewport::Mobile), (320, 50));
        assert_eq!(size("footerTop", Viewport::Desktop), (728, 90));
    }

    #[test]
    fn test_zone_label() {
        assert_eq!(zone_label("headerBottom"), "header Bottom");
        assert_eq!(zone_label("PlayerInside"), "Player Inside");
    }

    #[test]
    fn test_placeholder_label_is_escaped() {
        let html = render_html(&AdSlot::Placeholder {
            width: 1,
            height: 2,
            image_url: BANNER_IMAGE,
            label: "<script>".to_string(),
        });
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("width:1px;height:2px"));

        let raw = render_html(&AdSlot::Markup {
            html: "<script>ad()</script>".to_string(),
        });
        assert!(raw.contains("<script>ad()</script>"));
    }
}
