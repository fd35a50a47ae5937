use serde_json::Value;

use crate::{
    AddToResourceParams, AiPersonalizationParams, CreateEnrichmentParams, EnrichmentHistoryParams,
    GetEnrichmentParams, ResourceOption, RunEnrichmentParams, StdResult,
};

/// A trait for the SuperSearch enrichment operations of the Instantly API.
///
/// Responses are passed through as the raw JSON the API returned.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait EnrichmentService: Sync + Send {
    /// Creates a new enrichment from search criteria and enrichment settings.
    async fn create(&self, params: &CreateEnrichmentParams) -> StdResult<Value>;

    /// Retrieves enrichment details and status for a resource.
    async fn get(&self, params: &GetEnrichmentParams) -> StdResult<Value>;

    /// Executes an enrichment for specific leads or all unenriched leads.
    async fn run(&self, params: &RunEnrichmentParams) -> StdResult<Value>;

    /// Adds enrichment to a campaign or lead list.
    async fn add_to_resource(&self, params: &AddToResourceParams) -> StdResult<Value>;

    /// Runs AI personalization on the leads of a resource.
    async fn run_ai_personalization(&self, params: &AiPersonalizationParams) -> StdResult<Value>;

    /// Retrieves the enrichment history of a resource, following pagination on demand.
    async fn history(&self, params: &EnrichmentHistoryParams) -> StdResult<Value>;

    /// Lists the campaigns and lead lists offered by the resource locator dropdown.
    async fn list_resources(&self) -> StdResult<Vec<ResourceOption>>;

    /// Lists the enrichments offered by the enrichment locator dropdown.
    async fn list_enrichments(&self) -> StdResult<Vec<ResourceOption>>;
}
