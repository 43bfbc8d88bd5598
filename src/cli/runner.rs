//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::Client;
use crate::config::{ClientConfig, RequestOptions};
use crate::context::Context;
use crate::error::Result;
use crate::incidents::{
    CloseIncidentRequest, CreateIncidentRequest, IncidentFilter, UpdateIncidentRequest,
};
use crate::iter::SeqExt;
use futures::StreamExt;
use serde::Serialize;
use serde_json::json;
use std::time::Instant;
use tracing::{debug, info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command.
    ///
    /// Ctrl-C cancels the command's context; a running search stops at the
    /// next item.
    pub async fn run(&self) -> Result<()> {
        let ctx = Context::new();
        let token = ctx.token().clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling");
                token.cancel();
            }
        });

        let client = Client::new(self.client_config()?)?;
        self.execute(&client, &ctx).await
    }

    /// Run the command against an existing client
    pub async fn execute(&self, client: &Client, ctx: &Context) -> Result<()> {
        let opts = RequestOptions::new();
        let incidents = client.incidents();

        match &self.cli.command {
            Commands::Search {
                query,
                status,
                severity,
                incident_type,
                owner,
                limit,
                page_size,
            } => {
                let filter = IncidentFilter {
                    query: query.clone(),
                    status: status.clone(),
                    severity: severity.clone(),
                    incident_type: incident_type.clone(),
                    owner: owner.clone(),
                    ..IncidentFilter::default()
                };
                self.search(client, ctx, filter, *limit, *page_size).await
            }
            Commands::Get { id } => {
                let incident = incidents.get(ctx, id, &opts).await?;
                self.output(&incident)
            }
            Commands::Create {
                name,
                incident_type,
                severity,
                owner,
                description,
                fields,
            } => {
                let request = CreateIncidentRequest {
                    severity: *severity,
                    owner: owner.clone(),
                    description: description.clone(),
                    custom_fields: fields.iter().cloned().collect(),
                    ..CreateIncidentRequest::new(name.as_str(), incident_type.as_str())
                };
                let incident = incidents.create(ctx, &request, &opts).await?;
                info!("Created incident {}", incident.id);
                self.output(&incident)
            }
            Commands::Update {
                id,
                severity,
                owner,
                status,
                description,
                fields,
            } => {
                let request = UpdateIncidentRequest {
                    severity: *severity,
                    owner: owner.clone(),
                    status: status.clone(),
                    description: description.clone(),
                    custom_fields: (!fields.is_empty()).then(|| fields.iter().cloned().collect()),
                };
                if request.is_empty() {
                    warn!("No fields to update for incident {id}");
                }
                incidents.update(ctx, id, &request, &opts).await?;
                info!("Updated incident {id}");
                self.output(&json!({"id": id, "result": "updated"}))
            }
            Commands::Close { id, reason, notes } => {
                let request = CloseIncidentRequest {
                    reason: reason.clone(),
                    notes: notes.clone(),
                };
                incidents.close(ctx, id, &request, &opts).await?;
                info!("Closed incident {id}");
                self.output(&json!({"id": id, "result": "closed"}))
            }
            Commands::Delete { id } => {
                incidents.delete(ctx, id, &opts).await?;
                info!("Deleted incident {id}");
                self.output(&json!({"id": id, "result": "deleted"}))
            }
        }
    }

    /// Combine flags (including their environment fallbacks) with the config file
    fn client_config(&self) -> Result<ClientConfig> {
        let flags = ClientConfig {
            base_url: self.cli.base_url.clone(),
            key_id: self.cli.key_id.clone(),
            api_key: self.cli.api_key.clone(),
            timeout_secs: self.cli.timeout,
            user_agent: None,
        };

        match &self.cli.config {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Ok(flags.merge(ClientConfig::from_file(path)?))
            }
            None => Ok(flags),
        }
    }

    async fn search(
        &self,
        client: &Client,
        ctx: &Context,
        filter: IncidentFilter,
        limit: Option<usize>,
        page_size: i64,
    ) -> Result<()> {
        let start = Instant::now();
        let seq = client.incidents().search_with_page_size(
            ctx,
            filter,
            page_size,
            &RequestOptions::new(),
        );
        let mut seq = match limit {
            Some(n) => seq.take_items(n).boxed_seq(),
            None => seq,
        };

        let mut count = 0usize;
        while let Some(incident) = seq.next().await {
            self.output(&incident?)?;
            count += 1;
        }

        info!(
            "Fetched {} incidents in {:.2}s",
            count,
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }

    fn output<T: Serialize>(&self, value: &T) -> Result<()> {
        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{line}");
        Ok(())
    }
}
