//! WeatherAPI.com client

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::state::{Location, WeatherPayload};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Parse(String),
}

/// Location lookup and forecast source
#[async_trait]
pub trait WeatherService: Send + Sync {
    /// Candidates whose name starts with `query`.
    async fn search_locations(&self, query: &str) -> Result<Vec<Location>, ApiError>;

    /// Current conditions plus `days` days of forecast for `city`.
    async fn forecast(&self, city: &str, days: u8) -> Result<WeatherPayload, ApiError>;
}

// ============================================================================
// HTTP client
// ============================================================================

pub struct WeatherApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherApiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, ApiError> {
        let api_key = api_key.into();
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .user_agent(concat!("citycast/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search.json?key={}&q={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(query)
        )
    }

    fn forecast_url(&self, city: &str, days: u8) -> String {
        format!(
            "{}/forecast.json?key={}&q={}&days={}&aqi=no&alerts=no",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(city),
            days
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl WeatherService for WeatherApiClient {
    async fn search_locations(&self, query: &str) -> Result<Vec<Location>, ApiError> {
        self.get_json(&self.search_url(query.trim())).await
    }

    async fn forecast(&self, city: &str, days: u8) -> Result<WeatherPayload, ApiError> {
        self.get_json(&self.forecast_url(city, days)).await
    }
}

// ============================================================================
// Error bodies
// ============================================================================

/// `{"error": {"code": 1006, "message": "No matching location found."}}`
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

fn error_from_body(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|response| response.error.message)
        .unwrap_or_else(|_| {
            reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|code| code.canonical_reason())
                .unwrap_or("request rejected")
                .to_string()
        });
    ApiError::Status { status, message }
}
