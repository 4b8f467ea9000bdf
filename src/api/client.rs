use crate::models::{Bet, BetCreate, BetUpdate};
use crate::utils::aggregation::Summary;
use crate::utils::filtering::BetFilter;
use crate::utils::validation::validate;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

const API_PREFIX: &str = "/api/v1";

/// Failures talking to the bets API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bet not found")]
    NotFound,
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("bets API returned unexpected status: {0}")]
    UnexpectedStatus(StatusCode),
    #[error(transparent)]
    Network(#[from] reqwest::Error),
}

/// Error body the bets API sends back; `detail` is a list of messages
/// for validation failures and a single string otherwise
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: serde_json::Value,
}

impl ErrorBody {
    fn messages(self) -> Vec<String> {
        match self.detail {
            serde_json::Value::Array(items) => items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            serde_json::Value::String(message) => vec![message],
            _ => Vec::new(),
        }
    }
}

/// HTTP client for the bets API
pub struct BetApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl BetApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match status {
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            StatusCode::UNPROCESSABLE_ENTITY => {
                let body: ErrorBody = response.json().await.unwrap_or_default();
                Err(ApiError::Validation(body.messages()))
            }
            other => Err(ApiError::UnexpectedStatus(other)),
        }
    }

    /// Fetch bets matching the filter; an empty filter returns everything
    pub async fn list_bets(&self, filter: &BetFilter) -> Result<Vec<Bet>, ApiError> {
        let response = self
            .client
            .get(self.url("/bets"))
            .query(&filter.to_query())
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn get_bet(&self, id: i64) -> Result<Bet, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/bets/{}", id)))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Create a bet. The payload is validated locally first so the user
    /// sees every problem at once without a round trip.
    pub async fn create_bet(&self, input: &BetCreate) -> Result<Bet, ApiError> {
        if let Err(errors) = validate(input) {
            return Err(ApiError::Validation(
                errors.iter().map(|e| e.to_string()).collect(),
            ));
        }

        let response = self
            .client
            .post(self.url("/bets"))
            .json(input)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Merge a partial update into a stored bet
    pub async fn update_bet(&self, id: i64, patch: &BetUpdate) -> Result<Bet, ApiError> {
        let response = self
            .client
            .patch(self.url(&format!("/bets/{}", id)))
            .json(patch)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Replace a stored bet wholesale
    pub async fn replace_bet(&self, id: i64, input: &BetCreate) -> Result<Bet, ApiError> {
        if let Err(errors) = validate(input) {
            return Err(ApiError::Validation(
                errors.iter().map(|e| e.to_string()).collect(),
            ));
        }

        let response = self
            .client
            .put(self.url(&format!("/bets/{}", id)))
            .json(input)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn delete_bet(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/bets/{}", id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Server-computed summary over the full ledger
    pub async fn get_summary(&self) -> Result<Summary, ApiError> {
        let response = self
            .client
            .get(self.url("/bets/analytics/summary"))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
