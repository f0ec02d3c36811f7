use serde::{Deserialize, Serialize};

use crate::models::settings::{AdBlockNotice, Genre, Page, SiteSettings, SliderConfig};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Everything the storefront shell needs before its first render.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapDto {
    pub initial_view: &'static str,
    pub site: SiteSettings,
    pub genres: Vec<Genre>,
    pub pages: Vec<Page>,
    pub sliders: Vec<SliderConfig>,
    pub adblock: AdBlockNotice,
}

#[derive(Debug, Serialize)]
pub struct CountDto {
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct IdsRequest {
    pub ids: Vec<String>,
}
