pub mod ads;
pub use ads::{AdSlot, Viewport};

pub mod catalogue;
pub use catalogue::{CatalogueError, CatalogueFilters, CatalogueService, View, ViewPage};

pub mod content_service;
pub mod content_service_impl;
pub use content_service::{ContentError, ContentService, PublishOutcome};
pub use content_service_impl::DocumentContentService;

pub mod links;
pub use links::{DistributeReport, DistributeRequest};

pub mod metadata;
pub use metadata::{MetadataSource, RemoteMetadata};

pub mod planning;
pub use planning::{PlanningBoard, PlanningFilter, PlanningProjector};

pub mod sequencer;
pub use sequencer::RequestSequencer;

pub mod settings_service;
pub mod settings_service_impl;
pub use settings_service::{SettingsError, SettingsService};
pub use settings_service_impl::DocumentSettingsService;

pub mod slug;
pub mod stats;
