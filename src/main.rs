use std::{sync::Arc, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::debug;
use serde_json::Value;

use instantly_supersearch::{
    AddToResourceParams, AiPersonalizationParams, ApiTransport, CreateEnrichmentParams,
    EnrichmentHistoryParams, EnrichmentPayload, EnrichmentService, GetEnrichmentParams,
    INSTANTLY_API_ENDPOINT, ResourceSelector, RestTransport, RunEnrichmentParams, SearchFilters,
    StdResult, SuperSearchService, TransportRateLimitEnforcer, TransportRetrier,
};

/// Command line arguments for the SuperSearch enrichment client
#[derive(Parser, Debug)]
#[command(version, about = "SuperSearch lead enrichment operations for the Instantly API")]
struct Args {
    /// Base URL of the Instantly API
    #[arg(long, env = "INSTANTLY_API_URL", default_value = INSTANTLY_API_ENDPOINT)]
    api_url: String,

    /// Maximum number of retries for a failed API call
    #[arg(long, default_value_t = 3)]
    max_retries: u32,

    #[command(subcommand)]
    operation: Operation,
}

/// Enrichment data product toggles shared by the create and add operations
#[derive(clap::Args, Debug)]
struct PayloadFlags {
    /// Find and verify work email addresses
    #[arg(long)]
    work_email_enrichment: Option<bool>,

    /// Complete profile enrichment with all available data
    #[arg(long)]
    fully_enriched_profile: Option<bool>,

    /// Verify email addresses for deliverability
    #[arg(long)]
    email_verification: Option<bool>,

    /// Include job posting and career information
    #[arg(long)]
    joblisting: Option<bool>,

    /// Company technology stack and tools used
    #[arg(long)]
    technologies: Option<bool>,

    /// Recent company news and announcements
    #[arg(long)]
    news: Option<bool>,

    /// Company funding rounds and investment data
    #[arg(long)]
    funding: Option<bool>,
}

impl PayloadFlags {
    fn to_payload(&self) -> EnrichmentPayload {
        let mut payload = EnrichmentPayload::default();
        if let Some(value) = self.work_email_enrichment {
            payload.work_email_enrichment = value;
        }
        if let Some(value) = self.fully_enriched_profile {
            payload.fully_enriched_profile = value;
        }
        if let Some(value) = self.email_verification {
            payload.email_verification = value;
        }
        if let Some(value) = self.joblisting {
            payload.joblisting = value;
        }
        if let Some(value) = self.technologies {
            payload.technologies = value;
        }
        if let Some(value) = self.news {
            payload.news = value;
        }
        if let Some(value) = self.funding {
            payload.funding = value;
        }

        payload
    }
}

#[derive(Subcommand, Debug)]
enum Operation {
    /// Create a new SuperSearch enrichment with search criteria and enrichment settings
    Create {
        /// Name for the enrichment
        #[arg(short, long)]
        name: String,

        /// UUID of the campaign or list to enrich leads into
        #[arg(long)]
        resource_id: Option<String>,

        /// Type of the target resource ("campaign" or "list")
        #[arg(long)]
        resource_type: Option<String>,

        /// Geographic locations to search
        #[arg(long, value_delimiter = ',')]
        locations: Vec<String>,

        /// Departments to target
        #[arg(long, value_delimiter = ',')]
        departments: Vec<String>,

        /// Seniority levels to target
        #[arg(long, value_delimiter = ',')]
        levels: Vec<String>,

        /// Company domains to target
        #[arg(long, value_delimiter = ',')]
        domains: Vec<String>,

        /// Search filters as a JSON object, overriding the individual filter flags
        #[arg(long)]
        filters: Option<String>,

        /// Maximum number of leads to find
        #[arg(long)]
        max_results: Option<u32>,

        /// Custom name for the list created during enrichment
        #[arg(long)]
        list_name: Option<String>,

        /// Automatically enrich leads added to the resource later
        #[arg(long)]
        auto_update: Option<bool>,

        /// Skip enrichment for leads without an email address
        #[arg(long)]
        skip_rows_without_email: Option<bool>,

        #[command(flatten)]
        payload: PayloadFlags,
    },

    /// Get SuperSearch enrichment details and status for a resource
    Get {
        /// UUID of the campaign or list resource
        resource_id: String,

        /// Retrieve comprehensive enrichment results
        #[arg(long)]
        all: bool,
    },

    /// Execute an enrichment for specific leads or all unenriched leads
    Run {
        /// UUID of the enrichment to execute
        enrichment_id: String,

        /// Specific lead UUIDs to enrich
        #[arg(long, value_delimiter = ',')]
        lead_ids: Vec<String>,

        /// Enrichment data product to run (e.g. "work_email_enrichment")
        #[arg(long)]
        enrichment_type: Option<String>,

        /// Maximum number of leads to enrich
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Add enrichment to a campaign or lead list
    AddToResource {
        /// UUID of the campaign or list resource
        resource_id: String,

        /// Automatically enrich leads added to the resource later
        #[arg(long)]
        auto_update: Option<bool>,

        /// Skip enrichment for leads without an email address
        #[arg(long)]
        skip_rows_without_email: Option<bool>,

        /// Maximum number of leads to enrich in this batch
        #[arg(long)]
        limit: Option<u32>,

        #[command(flatten)]
        payload: PayloadFlags,
    },

    /// Run AI personalization on the leads of a resource
    Personalize {
        /// UUID of the campaign or list resource
        resource_id: String,

        /// Lead data column the personalization results are stored in
        #[arg(long, default_value = "ai_personalization")]
        output_column: String,

        /// Type of the target resource ("campaign" or "list")
        #[arg(long, default_value = "campaign")]
        resource_type: String,

        /// AI model to use (e.g. "gpt-4o")
        #[arg(long, default_value = "gpt-4o")]
        model: String,

        /// Lead data columns fed to the model
        #[arg(long, value_delimiter = ',')]
        input_columns: Vec<String>,

        /// Use the account data for enhanced personalization
        #[arg(long)]
        use_instantly_account: Option<bool>,

        /// Overwrite existing personalization data
        #[arg(long)]
        overwrite: Option<bool>,

        /// Automatically personalize leads added to the resource later
        #[arg(long)]
        auto_update: Option<bool>,

        /// Skip personalization for leads without an email address
        #[arg(long)]
        skip_leads_without_email: Option<bool>,

        /// Maximum number of leads to personalize in this batch
        #[arg(long)]
        limit: Option<u32>,

        /// Prompt template, with {{field_name}} placeholders for lead data
        #[arg(long)]
        prompt: Option<String>,

        /// Predefined personalization template to use instead of a prompt
        #[arg(long)]
        template_id: Option<String>,
    },

    /// Get the enrichment history of a resource
    History {
        /// UUID of the campaign or list resource
        resource_id: String,

        /// Follow pagination and return every history record
        #[arg(long)]
        return_all: bool,

        /// Maximum number of history records to return (max 100)
        #[arg(long)]
        limit: Option<u32>,
    },

    /// List the campaigns and lead lists available as enrichment targets
    ListResources,
}

#[tokio::main]
async fn main() -> StdResult<()> {
    env_logger::init();
    let args = Args::parse();
    debug!("Arguments: {args:?}");

    let service = build_service(&args)?;
    let output = execute(&args.operation, service.as_ref()).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn build_service(args: &Args) -> StdResult<Arc<dyn EnrichmentService>> {
    let transport = Arc::new(RestTransport::try_new(&args.api_url)?);
    let transport = Arc::new(TransportRetrier::new(
        transport,
        args.max_retries,
        Duration::from_millis(500),
    ));
    let transport: Arc<dyn ApiTransport> = Arc::new(TransportRateLimitEnforcer::new(transport));

    Ok(Arc::new(SuperSearchService::new(transport)))
}

async fn execute(operation: &Operation, service: &dyn EnrichmentService) -> StdResult<Value> {
    match operation {
        Operation::Create {
            name,
            resource_id,
            resource_type,
            locations,
            departments,
            levels,
            domains,
            filters,
            max_results,
            list_name,
            auto_update,
            skip_rows_without_email,
            payload,
        } => {
            let search_filters = match filters {
                Some(filters) => serde_json::from_str(filters)
                    .with_context(|| "Invalid search filters JSON")?,
                None => SearchFilters {
                    locations: locations.clone(),
                    department: departments.clone(),
                    level: levels.clone(),
                    domains: domains.clone(),
                    ..Default::default()
                },
            };
            let params = CreateEnrichmentParams {
                name: name.clone(),
                search_filters,
                enrichment_payload: payload.to_payload(),
                max_results: *max_results,
                resource_id: resource_id.clone(),
                resource_type: resource_type
                    .as_deref()
                    .map(|value| value.parse())
                    .transpose()?,
                list_name: list_name.clone(),
                auto_update: *auto_update,
                skip_rows_without_email: *skip_rows_without_email,
            };

            service.create(&params).await
        }
        Operation::Get { resource_id, all } => {
            let params = GetEnrichmentParams {
                resource_id: ResourceSelector::ById(resource_id.clone()),
                all_enrichments: *all,
            };

            service.get(&params).await
        }
        Operation::Run {
            enrichment_id,
            lead_ids,
            enrichment_type,
            limit,
        } => {
            let params = RunEnrichmentParams {
                enrichment_id: ResourceSelector::ById(enrichment_id.clone()),
                lead_ids: lead_ids.clone(),
                enrichment_type: enrichment_type
                    .as_deref()
                    .map(|value| value.parse())
                    .transpose()?,
                limit: *limit,
            };

            service.run(&params).await
        }
        Operation::AddToResource {
            resource_id,
            auto_update,
            skip_rows_without_email,
            limit,
            payload,
        } => {
            let params = AddToResourceParams {
                resource_id: ResourceSelector::ById(resource_id.clone()),
                enrichment_payload: payload.to_payload(),
                auto_update: *auto_update,
                skip_rows_without_email: *skip_rows_without_email,
                limit: *limit,
            };

            service.add_to_resource(&params).await
        }
        Operation::Personalize {
            resource_id,
            output_column,
            resource_type,
            model,
            input_columns,
            use_instantly_account,
            overwrite,
            auto_update,
            skip_leads_without_email,
            limit,
            prompt,
            template_id,
        } => {
            let params = AiPersonalizationParams {
                resource_id: ResourceSelector::ById(resource_id.clone()),
                output_column: output_column.clone(),
                resource_type: resource_type.parse()?,
                model_version: model.parse()?,
                input_columns: input_columns.clone(),
                use_instantly_account: *use_instantly_account,
                overwrite: *overwrite,
                auto_update: *auto_update,
                skip_leads_without_email: *skip_leads_without_email,
                limit: *limit,
                prompt: prompt.clone(),
                template_id: template_id.clone(),
            };

            service.run_ai_personalization(&params).await
        }
        Operation::History {
            resource_id,
            return_all,
            limit,
        } => {
            let params = EnrichmentHistoryParams {
                resource_id: ResourceSelector::ById(resource_id.clone()),
                return_all: *return_all,
                limit: *limit,
            };

            service.history(&params).await
        }
        Operation::ListResources => {
            let options = service.list_resources().await?;

            Ok(serde_json::to_value(options)?)
        }
    }
}
