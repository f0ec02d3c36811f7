use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::{CatalogueService, ContentService, SettingsService};
use crate::state::SharedState;
use crate::store::DocumentStore;

mod ads;
pub mod auth;
mod catalogue;
mod content;
mod error;
mod observability;
mod planning;
mod settings;
mod types;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<Config> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.shared.store
    }

    #[must_use]
    pub fn catalogue(&self) -> &Arc<CatalogueService> {
        &self.shared.catalogue
    }

    #[must_use]
    pub fn content(&self) -> &Arc<dyn ContentService> {
        &self.shared.content
    }

    #[must_use]
    pub fn settings(&self) -> &Arc<dyn SettingsService> {
        &self.shared.settings
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let admin_routes = create_admin_router(state.clone());

    let api_router = Router::new()
        .route("/bootstrap", get(catalogue::bootstrap))
        .route("/home", get(catalogue::home))
        .route("/catalogue", get(catalogue::catalogue))
        .route("/catalogue/random", get(catalogue::random))
        .route("/catalogue/snapshot", get(catalogue::snapshot))
        .route("/titles/{id}", get(catalogue::title_detail))
        .route(
            "/titles/{id}/recommendations",
            get(catalogue::recommendations),
        )
        .route(
            "/titles/{id}/seasons/{season}/episodes",
            get(catalogue::season_episodes),
        )
        .route("/latest-episodes", get(catalogue::latest))
        .route("/planning", get(planning::get_planning))
        .route("/ads/{zone}", get(ads::get_slot))
        .route("/ads/{zone}/html", get(ads::get_slot_html))
        .route("/adblock", get(ads::get_adblock))
        .route("/genres", get(settings::list_genres))
        .route("/pages", get(settings::list_pages))
        .route("/sliders", get(settings::list_sliders))
        .route("/seo/{page}", get(settings::render_seo))
        .route("/admin/login", post(auth::login))
        .nest("/admin", admin_routes)
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::track_metrics))
}

fn create_admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/content", get(content::list_content))
        .route("/content", post(content::upsert_content))
        .route("/content/delete", post(content::remove_many))
        .route("/content/publish", post(content::toggle_publish))
        .route("/content/{id}", get(content::get_content))
        .route("/content/{id}", delete(content::remove_content))
        .route("/content/{id}/pin", post(content::toggle_pin))
        .route("/content/{id}/seasons", post(content::add_season))
        .route("/content/{id}/links", post(content::distribute_links))
        .route(
            "/content/{id}/seasons/{season}/episodes",
            put(content::save_episode),
        )
        .route(
            "/content/{id}/seasons/{season}/episodes/bulk",
            post(content::bulk_add),
        )
        .route(
            "/content/{id}/seasons/{season}/episodes/delete",
            post(content::delete_episodes),
        )
        .route(
            "/content/{id}/seasons/{season}/players",
            delete(content::clear_players),
        )
        .route(
            "/content/{id}/seasons/{season}/sync",
            post(content::sync_season),
        )
        .route("/links/auto-distribute", post(content::auto_distribute_text))
        .route("/links/group-manga", post(content::group_manga_text))
        .route("/planning/new-entry", get(content::new_planning_entry))
        .route("/import/tmdb", post(content::import_tmdb))
        .route("/import/mal", post(content::import_mal))
        .route("/stats", get(content::get_stats))
        .route("/ads", get(ads::get_ads))
        .route("/ads", put(ads::replace_ads))
        .route("/ads/{zone}", put(ads::update_zone))
        .route("/ads/{zone}", delete(ads::clear_zone))
        .route("/ads/{zone}/toggle", post(ads::toggle_zone))
        .route("/adblock", get(ads::get_adblock))
        .route("/adblock", put(ads::set_adblock))
        .route("/genres", get(settings::list_genres))
        .route("/genres", post(settings::save_genre))
        .route("/genres/delete", post(settings::delete_genres))
        .route("/pages", get(settings::list_pages))
        .route("/pages", post(settings::save_page))
        .route("/pages/delete", post(settings::delete_pages))
        .route("/sliders", get(settings::list_sliders))
        .route("/sliders", put(settings::update_slider))
        .route("/permalinks", get(settings::get_permalinks))
        .route("/permalinks", put(settings::set_permalinks))
        .route("/advanced", get(settings::get_advanced))
        .route("/advanced", put(settings::set_advanced))
        .route("/site", get(settings::get_site))
        .route("/site", put(settings::set_site))
        .route("/seo", get(settings::get_seo))
        .route("/seo", put(settings::set_seo))
        .route("/sitemap", get(settings::get_sitemap))
        .route("/sitemap", put(settings::set_sitemap))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
