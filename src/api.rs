// API client module: a small blocking HTTP client that uploads the parsed
// recipes to the meal planner's bulk import endpoint in one request.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ImportConfig;
use crate::error::{ImportError, Result};
use crate::records::RecipeRecord;

/// Blocking client bound to a single bulk import endpoint.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    endpoint: String,
}

/// Request body: every recipe row goes up in one batch.
#[derive(Serialize, Debug)]
pub struct ImportRequest<'a> {
    pub recipes: &'a [RecipeRecord],
}

/// Server verdict on the batch. Every field is optional: a missing count
/// stays `None` instead of turning into zero. Counts and error entries are
/// only echoed back to the user, so they are kept as raw JSON values.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct ImportResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub imported: Option<Value>,
    #[serde(default)]
    pub skipped: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<RecipeError>>,
}

/// One row the server could not store.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone)]
pub struct RecipeError {
    #[serde(default)]
    pub recipe: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl ApiClient {
    /// Build a client for the endpoint in `config`. No request timeout is
    /// set, so an upload waits for the server as long as the transport does.
    pub fn new(config: &ImportConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(ImportError::Client)?;
        Ok(ApiClient {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST `{"recipes": [...]}` and parse the server's summary. A non-2xx
    /// status comes back as `ImportError::Http` with the raw body.
    pub fn import_recipes(&self, recipes: &[RecipeRecord]) -> Result<ImportResponse> {
        info!(endpoint = %self.endpoint, count = recipes.len(), "uploading recipes");
        let res = self
            .client
            .post(&self.endpoint)
            .json(&ImportRequest { recipes })
            .send()
            .map_err(ImportError::Transport)?;

        let status = res.status();
        let body = res.text().map_err(ImportError::Transport)?;
        debug!(%status, bytes = body.len(), "bulk import responded");

        if !status.is_success() {
            return Err(ImportError::Http { status, body });
        }
        Ok(serde_json::from_str(&body)?)
    }
}
