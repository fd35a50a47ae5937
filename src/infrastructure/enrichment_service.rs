use std::sync::Arc;

use anyhow::{Context, anyhow};
use log::{info, warn};
use serde_json::Value;

use crate::{
    AddToResourceParams, AiPersonalizationParams, ApiRequest, ApiTransport, CAMPAIGNS_PATH,
    CreateEnrichmentParams, EnrichmentHistoryParams, EnrichmentService, GetEnrichmentParams,
    HISTORY_MAX_LIMIT, LEAD_LISTS_PATH, Paginator, ResourceOption, RunEnrichmentParams, StdResult,
};

/// Handles the SuperSearch enrichment operations: formats the request body
/// for each operation, sends it, and passes the API response through.
pub struct SuperSearchService {
    transport: Arc<dyn ApiTransport>,
}

impl SuperSearchService {
    /// Creates a new `SuperSearchService` instance with the given transport.
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    async fn send(&self, request: ApiRequest) -> StdResult<Value> {
        info!("Processing request: {request}");

        Ok(self.transport.send(&request).await?.into_body())
    }

    async fn list_options(
        &self,
        path: &str,
        label_prefix: &str,
    ) -> StdResult<Vec<ResourceOption>> {
        let body = self.transport.send(&ApiRequest::get(path)).await?.into_body();
        let entries = match body.as_array() {
            Some(entries) => entries.clone(),
            None => body
                .get("items")
                .and_then(Value::as_array)
                .cloned()
                .with_context(|| format!("Unexpected listing response from {path}"))?,
        };

        Ok(entries
            .iter()
            .filter_map(|entry| {
                let name = entry.get("name")?.as_str()?;
                let value = entry.get("id")?.as_str()?;

                Some(ResourceOption::new(&format!("{label_prefix}: {name}"), value))
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl EnrichmentService for SuperSearchService {
    async fn create(&self, params: &CreateEnrichmentParams) -> StdResult<Value> {
        self.send(params.to_request()?).await
    }

    async fn get(&self, params: &GetEnrichmentParams) -> StdResult<Value> {
        self.send(params.to_request()?).await
    }

    async fn run(&self, params: &RunEnrichmentParams) -> StdResult<Value> {
        self.send(params.to_request()?).await
    }

    async fn add_to_resource(&self, params: &AddToResourceParams) -> StdResult<Value> {
        self.send(params.to_request()?).await
    }

    async fn run_ai_personalization(&self, params: &AiPersonalizationParams) -> StdResult<Value> {
        self.send(params.to_request()?).await
    }

    async fn history(&self, params: &EnrichmentHistoryParams) -> StdResult<Value> {
        if params.effective_limit() > HISTORY_MAX_LIMIT {
            return Err(anyhow!(
                "Limit cannot exceed {HISTORY_MAX_LIMIT}, the API caps history pages at {HISTORY_MAX_LIMIT} records"
            ));
        }

        if params.return_all {
            let items = Paginator::new(Arc::clone(&self.transport))
                .collect_all(&params.path()?, "history")
                .await?;

            Ok(Value::Array(items))
        } else {
            self.send(params.to_request()?).await
        }
    }

    /// A failed listing yields an empty dropdown instead of an error.
    async fn list_resources(&self) -> StdResult<Vec<ResourceOption>> {
        let mut options = match self.list_options(CAMPAIGNS_PATH, "Campaign").await {
            Ok(options) => options,
            Err(e) => {
                warn!("Failed to list campaigns: {e}");
                return Ok(Vec::new());
            }
        };
        match self.list_options(LEAD_LISTS_PATH, "List").await {
            Ok(lists) => options.extend(lists),
            Err(e) => {
                warn!("Failed to list lead lists: {e}");
                return Ok(Vec::new());
            }
        }

        Ok(options)
    }

    /// The API has no enrichment listing endpoint, the dropdown stays empty.
    async fn list_enrichments(&self) -> StdResult<Vec<ResourceOption>> {
        Ok(Vec::new())
    }
}
