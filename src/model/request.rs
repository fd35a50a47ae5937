use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

use super::{
    EnrichmentPayload, EnrichmentType, ModelVersion, ResourceSelector, ResourceType,
    SearchFilters, StdResult,
};

/// The base path of the SuperSearch enrichment endpoints.
pub const SUPERSEARCH_ENRICHMENT_PATH: &str = "/api/v2/supersearch-enrichment";

/// The path listing the campaigns of the account.
pub const CAMPAIGNS_PATH: &str = "/api/v2/campaigns";

/// The path listing the lead lists of the account.
pub const LEAD_LISTS_PATH: &str = "/api/v2/lead-lists";

/// The number of leads an enrichment finds when no maximum is supplied.
const DEFAULT_SEARCH_LIMIT: u32 = 100;

/// The number of history records returned when no limit is supplied.
pub const HISTORY_DEFAULT_LIMIT: u32 = 50;

/// The maximum number of history records the API returns per request.
pub const HISTORY_MAX_LIMIT: u32 = 100;

/// An HTTP method supported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    /// An HTTP GET.
    Get,
    /// An HTTP POST.
    Post,
}

impl Display for ApiMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiMethod::Get => write!(f, "GET"),
            ApiMethod::Post => write!(f, "POST"),
        }
    }
}

/// A request to the Instantly API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// The HTTP method of the request.
    pub(crate) method: ApiMethod,

    /// The path of the endpoint, relative to the API base URL.
    pub(crate) path: String,

    /// The query parameters appended to the path.
    pub(crate) query: Vec<(String, String)>,

    /// The JSON body of the request, if any.
    pub(crate) body: Option<Value>,
}

impl ApiRequest {
    /// Creates a GET request for the given path.
    pub fn get(path: &str) -> Self {
        Self {
            method: ApiMethod::Get,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Creates a POST request for the given path and JSON body.
    pub fn post(path: &str, body: Value) -> Self {
        Self {
            method: ApiMethod::Post,
            path: path.to_string(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Appends a query parameter to the request.
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Retrieves the HTTP method.
    pub fn method(&self) -> ApiMethod {
        self.method
    }

    /// Retrieves the endpoint path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Retrieves the query parameters.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Retrieves the JSON body, if any.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Creates a dummy GET request for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy() -> Self {
        Self::get(SUPERSEARCH_ENRICHMENT_PATH)
    }
}

impl Display for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)?;
        for (index, (key, value)) in self.query.iter().enumerate() {
            let separator = if index == 0 { '?' } else { '&' };
            write!(f, "{separator}{key}={value}")?;
        }
        Ok(())
    }
}

/// Parameters for creating a SuperSearch enrichment.
#[derive(Debug, Clone, Default)]
pub struct CreateEnrichmentParams {
    /// The name of the enrichment; trimmed before it is sent.
    pub name: String,

    /// The search criteria selecting the leads to find.
    pub search_filters: SearchFilters,

    /// The enrichment data products to apply.
    pub enrichment_payload: EnrichmentPayload,

    /// The maximum number of leads to find.
    pub max_results: Option<u32>,

    /// The campaign or list the found leads are enriched into.
    pub resource_id: Option<String>,

    /// The kind of the target resource.
    pub resource_type: Option<ResourceType>,

    /// A custom name for the list created during enrichment.
    pub list_name: Option<String>,

    /// Automatically enrich leads added to the resource later.
    pub auto_update: Option<bool>,

    /// Skip enrichment for leads without an email address.
    pub skip_rows_without_email: Option<bool>,
}

#[derive(Serialize)]
struct CreateEnrichmentBody<'a> {
    enrichment_payload: &'a EnrichmentPayload,
    search_filters: &'a SearchFilters,
    search_name: &'a str,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource_type: Option<ResourceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    list_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auto_update: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skip_rows_without_email: Option<bool>,
}

impl CreateEnrichmentParams {
    /// Builds the API request for this operation.
    pub fn to_request(&self) -> StdResult<ApiRequest> {
        let body = serde_json::to_value(CreateEnrichmentBody {
            enrichment_payload: &self.enrichment_payload,
            search_filters: &self.search_filters,
            search_name: self.name.trim(),
            limit: self.max_results.unwrap_or(DEFAULT_SEARCH_LIMIT),
            resource_id: self.resource_id.as_deref(),
            resource_type: self.resource_type,
            list_name: self.list_name.as_deref(),
            auto_update: self.auto_update,
            skip_rows_without_email: self.skip_rows_without_email,
        })?;

        Ok(ApiRequest::post(SUPERSEARCH_ENRICHMENT_PATH, body))
    }
}

/// Parameters for retrieving a SuperSearch enrichment.
#[derive(Debug, Clone)]
pub struct GetEnrichmentParams {
    /// The campaign or list resource to read the enrichment of.
    pub resource_id: ResourceSelector,

    /// Retrieve comprehensive enrichment results.
    pub all_enrichments: bool,
}

impl GetEnrichmentParams {
    /// Builds the API request for this operation.
    pub fn to_request(&self) -> StdResult<ApiRequest> {
        let resource_id = self.resource_id.resolve()?;
        let request = ApiRequest::get(&format!("{SUPERSEARCH_ENRICHMENT_PATH}/{resource_id}"));

        Ok(if self.all_enrichments {
            request.with_query("all", "true")
        } else {
            request
        })
    }
}

/// Parameters for running a SuperSearch enrichment.
#[derive(Debug, Clone)]
pub struct RunEnrichmentParams {
    /// The enrichment to execute.
    pub enrichment_id: ResourceSelector,

    /// Specific leads to enrich; all unenriched leads when empty.
    pub lead_ids: Vec<String>,

    /// The enrichment data product to run.
    pub enrichment_type: Option<EnrichmentType>,

    /// The maximum number of leads to enrich.
    pub limit: Option<u32>,
}

#[derive(Serialize)]
struct RunEnrichmentBody<'a> {
    enrichment_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    lead_ids: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    enrichment_type: Option<EnrichmentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

impl RunEnrichmentParams {
    /// Builds the API request for this operation.
    pub fn to_request(&self) -> StdResult<ApiRequest> {
        let enrichment_id = self.enrichment_id.resolve()?;
        let body = serde_json::to_value(RunEnrichmentBody {
            enrichment_id: &enrichment_id,
            lead_ids: if self.lead_ids.is_empty() {
                None
            } else {
                Some(&self.lead_ids)
            },
            enrichment_type: self.enrichment_type,
            limit: self.limit,
        })?;

        Ok(ApiRequest::post(
            &format!("{SUPERSEARCH_ENRICHMENT_PATH}/run"),
            body,
        ))
    }
}

/// Parameters for adding enrichment to a campaign or lead list.
#[derive(Debug, Clone)]
pub struct AddToResourceParams {
    /// The campaign or list resource to enrich.
    pub resource_id: ResourceSelector,

    /// The enrichment data products to apply.
    pub enrichment_payload: EnrichmentPayload,

    /// Automatically enrich leads added to the resource later.
    pub auto_update: Option<bool>,

    /// Skip enrichment for leads without an email address.
    pub skip_rows_without_email: Option<bool>,

    /// The maximum number of leads to enrich in this batch.
    pub limit: Option<u32>,
}

#[derive(Serialize)]
struct AddToResourceBody<'a> {
    enrichment_payload: &'a EnrichmentPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    auto_update: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skip_rows_without_email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

impl AddToResourceParams {
    /// Builds the API request for this operation.
    pub fn to_request(&self) -> StdResult<ApiRequest> {
        let resource_id = self.resource_id.resolve()?;
        let body = serde_json::to_value(AddToResourceBody {
            enrichment_payload: &self.enrichment_payload,
            auto_update: self.auto_update,
            skip_rows_without_email: self.skip_rows_without_email,
            limit: self.limit,
        })?;

        Ok(ApiRequest::post(
            &format!("{SUPERSEARCH_ENRICHMENT_PATH}/{resource_id}/add"),
            body,
        ))
    }
}

/// Parameters for running AI personalization on existing leads.
#[derive(Debug, Clone)]
pub struct AiPersonalizationParams {
    /// The campaign or list resource containing the leads to personalize.
    pub resource_id: ResourceSelector,

    /// The lead data column the personalization results are stored in.
    pub output_column: String,

    /// The kind of the target resource.
    pub resource_type: ResourceType,

    /// The AI model used for personalization.
    pub model_version: ModelVersion,

    /// Lead data columns fed to the model; all available data when empty.
    pub input_columns: Vec<String>,

    /// Use the account data for enhanced personalization.
    pub use_instantly_account: Option<bool>,

    /// Overwrite existing personalization data.
    pub overwrite: Option<bool>,

    /// Automatically personalize leads added to the resource later.
    pub auto_update: Option<bool>,

    /// Skip personalization for leads without an email address.
    pub skip_leads_without_email: Option<bool>,

    /// The maximum number of leads to personalize in this batch.
    pub limit: Option<u32>,

    /// The prompt template; `{{field_name}}` placeholders expand to lead data.
    pub prompt: Option<String>,

    /// A predefined personalization template to use instead of a prompt.
    pub template_id: Option<String>,
}

#[derive(Serialize)]
struct AiPersonalizationBody<'a> {
    resource_id: &'a str,
    output_column: &'a str,
    resource_type: ResourceType,
    model_version: ModelVersion,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_columns: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    use_instantly_account: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    overwrite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auto_update: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skip_leads_without_email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template_id: Option<&'a str>,
}

impl AiPersonalizationParams {
    /// Builds the API request for this operation.
    pub fn to_request(&self) -> StdResult<ApiRequest> {
        let resource_id = self.resource_id.resolve()?;
        let body = serde_json::to_value(AiPersonalizationBody {
            resource_id: &resource_id,
            output_column: &self.output_column,
            resource_type: self.resource_type,
            model_version: self.model_version,
            input_columns: if self.input_columns.is_empty() {
                None
            } else {
                Some(&self.input_columns)
            },
            use_instantly_account: self.use_instantly_account,
            overwrite: self.overwrite,
            auto_update: self.auto_update,
            skip_leads_without_email: self.skip_leads_without_email,
            limit: self.limit,
            prompt: self.prompt.as_deref(),
            template_id: self.template_id.as_deref(),
        })?;

        Ok(ApiRequest::post(
            &format!("{SUPERSEARCH_ENRICHMENT_PATH}/ai"),
            body,
        ))
    }
}

/// Parameters for retrieving the enrichment history of a resource.
#[derive(Debug, Clone)]
pub struct EnrichmentHistoryParams {
    /// The campaign or list resource to read the history of.
    pub resource_id: ResourceSelector,

    /// Follow pagination and return every history record.
    pub return_all: bool,

    /// The maximum number of history records to return.
    pub limit: Option<u32>,
}

impl EnrichmentHistoryParams {
    /// The limit effectively sent to the API.
    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(HISTORY_DEFAULT_LIMIT)
    }

    /// The path of the history endpoint for the selected resource.
    pub fn path(&self) -> StdResult<String> {
        let resource_id = self.resource_id.resolve()?;

        Ok(format!(
            "{SUPERSEARCH_ENRICHMENT_PATH}/history/{resource_id}"
        ))
    }

    /// Builds the single-page API request for this operation.
    pub fn to_request(&self) -> StdResult<ApiRequest> {
        Ok(ApiRequest::get(&self.path()?)
            .with_query("limit", &self.effective_limit().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::ResourceSelector;

    use super::*;

    #[test]
    fn api_request_display_includes_query_parameters() {
        let request = ApiRequest::get("/api/v2/campaigns")
            .with_query("limit", "10")
            .with_query("starting_after", "cursor123");

        assert_eq!(
            "GET /api/v2/campaigns?limit=10&starting_after=cursor123",
            request.to_string()
        );
    }

    #[test]
    fn create_body_contains_required_fields_and_defaults() {
        let params = CreateEnrichmentParams {
            name: "  Founders in Paris  ".to_string(),
            ..Default::default()
        };

        let request = params.to_request().unwrap();

        assert_eq!(ApiMethod::Post, request.method());
        assert_eq!(SUPERSEARCH_ENRICHMENT_PATH, request.path());
        assert_eq!(
            &json!({
                "enrichment_payload": {
                    "work_email_enrichment": true,
                    "fully_enriched_profile": true,
                    "email_verification": false,
                    "joblisting": true,
                    "technologies": true,
                    "news": true,
                    "funding": true,
                },
                "search_filters": {
                    "locations": [],
                    "department": [],
                    "level": [],
                    "employeeCount": [],
                    "revenue": [],
                    "news": [],
                    "title": {},
                    "name": [],
                    "companyName": {},
                    "lookAlike": "",
                    "keywordFilter": {},
                    "industry": {},
                    "domains": [],
                    "fundingType": [],
                    "skipOwnedLeads": true,
                    "showOneLeadPerCompany": true,
                },
                "search_name": "Founders in Paris",
                "limit": 100,
            }),
            request.body().unwrap()
        );
    }

    #[test]
    fn create_body_copies_optional_fields_when_present() {
        let params = CreateEnrichmentParams {
            name: "Founders".to_string(),
            max_results: Some(500),
            resource_id: Some("01234567-89ab-cdef-0123-456789abcdef".to_string()),
            resource_type: Some(ResourceType::List),
            list_name: Some("My SuperSearch List".to_string()),
            auto_update: Some(false),
            skip_rows_without_email: Some(true),
            ..Default::default()
        };

        let body = params.to_request().unwrap().body().unwrap().clone();

        assert_eq!(json!(500), body["limit"]);
        assert_eq!(
            json!("01234567-89ab-cdef-0123-456789abcdef"),
            body["resource_id"]
        );
        assert_eq!(json!(2), body["resource_type"]);
        assert_eq!(json!("My SuperSearch List"), body["list_name"]);
        assert_eq!(json!(false), body["auto_update"]);
        assert_eq!(json!(true), body["skip_rows_without_email"]);
    }

    #[test]
    fn get_request_targets_the_selected_resource() {
        let params = GetEnrichmentParams {
            resource_id: ResourceSelector::FromList("resource-1".to_string()),
            all_enrichments: false,
        };

        let request = params.to_request().unwrap();

        assert_eq!(ApiMethod::Get, request.method());
        assert_eq!("/api/v2/supersearch-enrichment/resource-1", request.path());
        assert!(request.query().is_empty());
    }

    #[test]
    fn get_request_adds_all_query_parameter_when_requested() {
        let params = GetEnrichmentParams {
            resource_id: ResourceSelector::FromList("resource-1".to_string()),
            all_enrichments: true,
        };

        let request = params.to_request().unwrap();

        assert_eq!(&[("all".to_string(), "true".to_string())], request.query());
    }

    #[test]
    fn get_request_fails_on_malformed_typed_id() {
        let params = GetEnrichmentParams {
            resource_id: ResourceSelector::ById("not-a-uuid".to_string()),
            all_enrichments: false,
        };

        params.to_request().expect_err("Expected an error");
    }

    #[test]
    fn run_body_contains_only_the_enrichment_id_by_default() {
        let params = RunEnrichmentParams {
            enrichment_id: ResourceSelector::FromList("enrichment-1".to_string()),
            lead_ids: vec![],
            enrichment_type: None,
            limit: None,
        };

        let request = params.to_request().unwrap();

        assert_eq!("/api/v2/supersearch-enrichment/run", request.path());
        assert_eq!(
            &json!({"enrichment_id": "enrichment-1"}),
            request.body().unwrap()
        );
    }

    #[test]
    fn run_body_copies_lead_ids_type_and_limit_when_present() {
        let params = RunEnrichmentParams {
            enrichment_id: ResourceSelector::FromList("enrichment-1".to_string()),
            lead_ids: vec!["lead-1".to_string(), "lead-2".to_string()],
            enrichment_type: Some(EnrichmentType::Technologies),
            limit: Some(25),
        };

        let body = params.to_request().unwrap().body().unwrap().clone();

        assert_eq!(
            json!({
                "enrichment_id": "enrichment-1",
                "lead_ids": ["lead-1", "lead-2"],
                "enrichment_type": "technologies",
                "limit": 25,
            }),
            body
        );
    }

    #[test]
    fn add_to_resource_body_contains_payload_and_optional_fields() {
        let params = AddToResourceParams {
            resource_id: ResourceSelector::FromList("resource-1".to_string()),
            enrichment_payload: EnrichmentPayload::default(),
            auto_update: Some(true),
            skip_rows_without_email: None,
            limit: Some(1000),
        };

        let request = params.to_request().unwrap();

        assert_eq!(
            "/api/v2/supersearch-enrichment/resource-1/add",
            request.path()
        );
        let body = request.body().unwrap();
        assert_eq!(json!(true), body["auto_update"]);
        assert_eq!(json!(1000), body["limit"]);
        assert!(body.get("skip_rows_without_email").is_none());
        assert_eq!(json!(false), body["enrichment_payload"]["email_verification"]);
    }

    #[test]
    fn ai_personalization_body_contains_required_fields() {
        let params = AiPersonalizationParams {
            resource_id: ResourceSelector::FromList("resource-1".to_string()),
            output_column: "ai_personalization".to_string(),
            resource_type: ResourceType::Campaign,
            model_version: ModelVersion::Gpt4o,
            input_columns: vec![],
            use_instantly_account: None,
            overwrite: None,
            auto_update: None,
            skip_leads_without_email: None,
            limit: None,
            prompt: None,
            template_id: None,
        };

        let request = params.to_request().unwrap();

        assert_eq!("/api/v2/supersearch-enrichment/ai", request.path());
        assert_eq!(
            &json!({
                "resource_id": "resource-1",
                "output_column": "ai_personalization",
                "resource_type": 1,
                "model_version": "gpt-4o",
            }),
            request.body().unwrap()
        );
    }

    #[test]
    fn ai_personalization_body_copies_optional_settings_when_present() {
        let params = AiPersonalizationParams {
            resource_id: ResourceSelector::FromList("resource-1".to_string()),
            output_column: "opening_line".to_string(),
            resource_type: ResourceType::List,
            model_version: ModelVersion::Claude35Haiku,
            input_columns: vec!["first_name".to_string(), "company_name".to_string()],
            use_instantly_account: Some(true),
            overwrite: Some(false),
            auto_update: Some(true),
            skip_leads_without_email: Some(true),
            limit: Some(100),
            prompt: Some("Write a personalized opening line for {{first_name}}".to_string()),
            template_id: Some("template_123".to_string()),
        };

        let body = params.to_request().unwrap().body().unwrap().clone();

        assert_eq!(json!(["first_name", "company_name"]), body["input_columns"]);
        assert_eq!(json!(true), body["use_instantly_account"]);
        assert_eq!(json!(false), body["overwrite"]);
        assert_eq!(json!(true), body["auto_update"]);
        assert_eq!(json!(true), body["skip_leads_without_email"]);
        assert_eq!(json!(100), body["limit"]);
        assert_eq!(
            json!("Write a personalized opening line for {{first_name}}"),
            body["prompt"]
        );
        assert_eq!(json!("template_123"), body["template_id"]);
        assert_eq!(json!("claude-3-5-haiku-20241022"), body["model_version"]);
    }

    #[test]
    fn history_request_uses_default_limit() {
        let params = EnrichmentHistoryParams {
            resource_id: ResourceSelector::FromList("resource-1".to_string()),
            return_all: false,
            limit: None,
        };

        let request = params.to_request().unwrap();

        assert_eq!(
            "/api/v2/supersearch-enrichment/history/resource-1",
            request.path()
        );
        assert_eq!(&[("limit".to_string(), "50".to_string())], request.query());
    }
}
