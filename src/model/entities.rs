use std::{fmt::Display, str::FromStr, time::Duration};

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::StdResult;

/// The kind of resource an enrichment attaches its leads to.
///
/// The API encodes this as a number: campaign = 1, list = 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// An email campaign.
    Campaign,
    /// A lead list.
    List,
}

impl ResourceType {
    /// The numeric code sent on the wire.
    pub fn code(&self) -> u8 {
        match self {
            ResourceType::Campaign => 1,
            ResourceType::List => 2,
        }
    }
}

impl Serialize for ResourceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl FromStr for ResourceType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "campaign" | "1" => Ok(ResourceType::Campaign),
            "list" | "2" => Ok(ResourceType::List),
            other => Err(anyhow!("Unknown resource type: {other}")),
        }
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceType::Campaign => write!(f, "campaign"),
            ResourceType::List => write!(f, "list"),
        }
    }
}

/// The per-provider toggles sent as the `enrichment_payload` of an enrichment.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct EnrichmentPayload {
    /// Find and verify work email addresses.
    pub work_email_enrichment: bool,
    /// Complete profile enrichment with all available data.
    pub fully_enriched_profile: bool,
    /// Verify email addresses for deliverability.
    pub email_verification: bool,
    /// Include job posting and career information.
    pub joblisting: bool,
    /// Company technology stack and tools used.
    pub technologies: bool,
    /// Recent company news and announcements.
    pub news: bool,
    /// Company funding rounds and investment data.
    pub funding: bool,
}

impl Default for EnrichmentPayload {
    fn default() -> Self {
        Self {
            work_email_enrichment: true,
            fully_enriched_profile: true,
            email_verification: false,
            joblisting: true,
            technologies: true,
            news: true,
            funding: true,
        }
    }
}

/// Search criteria sent as the `search_filters` of an enrichment.
///
/// Key casing is mixed on the wire and preserved here through renames.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SearchFilters {
    /// Geographic locations to search (city, state, country).
    pub locations: Vec<String>,
    /// Departments to target.
    pub department: Vec<String>,
    /// Seniority levels to target.
    pub level: Vec<String>,
    /// Employee count brackets.
    #[serde(rename = "employeeCount")]
    pub employee_count: Vec<String>,
    /// Revenue brackets.
    pub revenue: Vec<String>,
    /// News event categories.
    pub news: Vec<String>,
    /// Job title filter object.
    pub title: Map<String, Value>,
    /// Contact names to target.
    pub name: Vec<String>,
    /// Company name filter object.
    #[serde(rename = "companyName")]
    pub company_name: Map<String, Value>,
    /// A company domain to find look-alikes of.
    #[serde(rename = "lookAlike")]
    pub look_alike: String,
    /// Keyword filter object.
    #[serde(rename = "keywordFilter")]
    pub keyword_filter: Map<String, Value>,
    /// Industry filter object.
    pub industry: Map<String, Value>,
    /// Company domains to target.
    pub domains: Vec<String>,
    /// Funding round types to target.
    #[serde(rename = "fundingType")]
    pub funding_type: Vec<String>,
    /// Skip leads already present in the account.
    #[serde(rename = "skipOwnedLeads")]
    pub skip_owned_leads: bool,
    /// Return at most one lead per company.
    #[serde(rename = "showOneLeadPerCompany")]
    pub show_one_lead_per_company: bool,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            locations: Vec::new(),
            department: Vec::new(),
            level: Vec::new(),
            employee_count: Vec::new(),
            revenue: Vec::new(),
            news: Vec::new(),
            title: Map::new(),
            name: Vec::new(),
            company_name: Map::new(),
            look_alike: String::new(),
            keyword_filter: Map::new(),
            industry: Map::new(),
            domains: Vec::new(),
            funding_type: Vec::new(),
            skip_owned_leads: true,
            show_one_lead_per_company: true,
        }
    }
}

/// A single enrichment data product offered by the API.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentType {
    /// Work email discovery and verification.
    WorkEmailEnrichment,
    /// Full contact profile.
    FullyEnrichedProfile,
    /// Email deliverability verification.
    EmailVerification,
    /// Job posting data.
    Joblisting,
    /// Company technology stack.
    Technologies,
    /// Company news.
    News,
    /// Company funding data.
    Funding,
}

impl EnrichmentType {
    /// The identifier sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichmentType::WorkEmailEnrichment => "work_email_enrichment",
            EnrichmentType::FullyEnrichedProfile => "fully_enriched_profile",
            EnrichmentType::EmailVerification => "email_verification",
            EnrichmentType::Joblisting => "joblisting",
            EnrichmentType::Technologies => "technologies",
            EnrichmentType::News => "news",
            EnrichmentType::Funding => "funding",
        }
    }
}

impl FromStr for EnrichmentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work_email_enrichment" => Ok(EnrichmentType::WorkEmailEnrichment),
            "fully_enriched_profile" => Ok(EnrichmentType::FullyEnrichedProfile),
            "email_verification" => Ok(EnrichmentType::EmailVerification),
            "joblisting" => Ok(EnrichmentType::Joblisting),
            "technologies" => Ok(EnrichmentType::Technologies),
            "news" => Ok(EnrichmentType::News),
            "funding" => Ok(EnrichmentType::Funding),
            other => Err(anyhow!("Unknown enrichment type: {other}")),
        }
    }
}

impl Display for EnrichmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The AI model used for personalization.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ModelVersion {
    /// GPT-4o.
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    /// GPT-4o mini.
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    /// GPT-4 Turbo.
    #[serde(rename = "gpt-4-turbo")]
    Gpt4Turbo,
    /// Claude 3.5 Sonnet.
    #[serde(rename = "claude-3-5-sonnet-20241022")]
    Claude35Sonnet,
    /// Claude 3.5 Haiku.
    #[serde(rename = "claude-3-5-haiku-20241022")]
    Claude35Haiku,
    /// Claude 3 Opus.
    #[serde(rename = "claude-3-opus-20240229")]
    Claude3Opus,
}

impl ModelVersion {
    /// The identifier sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVersion::Gpt4o => "gpt-4o",
            ModelVersion::Gpt4oMini => "gpt-4o-mini",
            ModelVersion::Gpt4Turbo => "gpt-4-turbo",
            ModelVersion::Claude35Sonnet => "claude-3-5-sonnet-20241022",
            ModelVersion::Claude35Haiku => "claude-3-5-haiku-20241022",
            ModelVersion::Claude3Opus => "claude-3-opus-20240229",
        }
    }
}

impl FromStr for ModelVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gpt-4o" => Ok(ModelVersion::Gpt4o),
            "gpt-4o-mini" => Ok(ModelVersion::Gpt4oMini),
            "gpt-4-turbo" => Ok(ModelVersion::Gpt4Turbo),
            "claude-3-5-sonnet-20241022" => Ok(ModelVersion::Claude35Sonnet),
            "claude-3-5-haiku-20241022" => Ok(ModelVersion::Claude35Haiku),
            "claude-3-opus-20240229" => Ok(ModelVersion::Claude3Opus),
            other => Err(anyhow!("Unknown AI model version: {other}")),
        }
    }
}

impl Display for ModelVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dropdown option served to a resource locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOption {
    /// The label shown to the user.
    pub name: String,
    /// The identifier submitted when the option is picked.
    pub value: String,
}

impl ResourceOption {
    /// Creates a new `ResourceOption` with the given label and identifier.
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// A resource locator value: an identifier picked from a dropdown, or typed by hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceSelector {
    /// The identifier was picked from a listing and is used as-is.
    FromList(String),
    /// The identifier was typed by hand and must be a valid UUID.
    ById(String),
}

impl ResourceSelector {
    /// Resolves the selector to the identifier sent to the API.
    ///
    /// A hand-typed identifier that does not parse as a UUID is rejected
    /// before any request is made.
    pub fn resolve(&self) -> StdResult<String> {
        match self {
            ResourceSelector::FromList(value) => Ok(value.clone()),
            ResourceSelector::ById(value) => {
                Uuid::parse_str(value)
                    .with_context(|| format!("Invalid resource ID: {value}"))?;
                Ok(value.clone())
            }
        }
    }

    /// Creates a dummy selector for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy() -> Self {
        Self::FromList("01234567-89ab-cdef-0123-456789abcdef".to_string())
    }
}

impl Display for ResourceSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceSelector::FromList(value) => write!(f, "{value} (from list)"),
            ResourceSelector::ById(value) => write!(f, "{value} (by ID)"),
        }
    }
}

/// An API rate limit
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiRateLimit {
    /// The maximum number of requests that can be made in a given time period.
    pub limit: i64,
    /// The remaining number of requests that can be made in the current time period.
    pub remaining: i64,
    /// The time at which the rate limit will reset.
    pub reset_at: String,
}

impl ApiRateLimit {
    /// Whether the current time period has no requests left.
    pub fn is_exceeded(&self) -> bool {
        self.remaining <= 0
    }

    /// The time to wait from `now` until the rate limit resets.
    pub fn duration_until_reset(&self, now: DateTime<Utc>) -> StdResult<Duration> {
        let reset_at = DateTime::parse_from_rfc3339(&self.reset_at)
            .with_context(|| format!("Invalid rate limit reset time: {}", self.reset_at))?
            .with_timezone(&Utc);

        Ok((reset_at - now).to_std().unwrap_or_default())
    }

    /// Creates a dummy `ApiRateLimit` instance for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy() -> Self {
        Self {
            limit: 600,
            remaining: 599,
            reset_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }
}

impl Display for ApiRateLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RateLimit: calls={}/{}, reset={}",
            self.limit - self.remaining,
            self.limit,
            self.reset_at
        )
    }
}
