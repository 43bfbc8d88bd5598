//! Incident operations
//!
//! [`Incidents`] wraps the shared [`HttpClient`] and maps each call onto its
//! XSOAR endpoint. Searches are lazy: [`Incidents::search`] returns a
//! [`Seq`] that fetches `/incidents/search` pages only as items are pulled.

use super::models::{
    CloseBody, CloseIncidentRequest, CreateIncidentRequest, DeleteBody, Incident, IncidentFilter,
    IncidentPage, SearchRequest, UpdateBody, UpdateIncidentRequest,
};
use crate::config::RequestOptions;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::http::{ApiRequest, HttpClient};
use crate::iter::Seq;
use crate::pagination::{paginate, PageFetcher, PageRequest, DEFAULT_PAGE_SIZE};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

const RESOURCE_TYPE: &str = "incident";

/// Operations on XSOAR incidents
#[derive(Debug, Clone)]
pub struct Incidents {
    http: Arc<HttpClient>,
}

impl Incidents {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Lazily iterate over every incident matching `filter`.
    ///
    /// Pages of [`DEFAULT_PAGE_SIZE`] are fetched on demand. The sequence
    /// ends after the last page or after its first error, and stops early
    /// when `ctx` is cancelled.
    pub fn search(
        &self,
        ctx: &Context,
        filter: IncidentFilter,
        options: &RequestOptions,
    ) -> Seq<'static, Incident> {
        self.search_with_page_size(ctx, filter, DEFAULT_PAGE_SIZE, options)
    }

    /// Like [`search`](Self::search) with an explicit page size (normalized)
    pub fn search_with_page_size(
        &self,
        ctx: &Context,
        filter: IncidentFilter,
        page_size: i64,
        options: &RequestOptions,
    ) -> Seq<'static, Incident> {
        let fetcher = IncidentSearch {
            incidents: self.clone(),
            filter,
            options: options.clone(),
        };
        paginate(fetcher, ctx.clone(), page_size)
    }

    /// Fetch a single page of search results
    pub async fn search_page(
        &self,
        ctx: &Context,
        filter: &IncidentFilter,
        page: PageRequest,
        options: &RequestOptions,
    ) -> Result<IncidentPage> {
        let page = page.normalized();
        let body = serde_json::to_value(SearchRequest { filter, page })?;
        let request = ApiRequest::post(["incidents", "search"])
            .json(body)
            .headers(&options.headers);

        let result: Option<IncidentPage> = self.call(ctx, request, None).await?;
        Ok(result.unwrap_or_default())
    }

    /// Get an incident by ID
    pub async fn get(&self, ctx: &Context, id: &str, options: &RequestOptions) -> Result<Incident> {
        validate_id(id)?;

        let request = ApiRequest::get(["incident", id]).headers(&options.headers);
        let incident: Option<Incident> = self.call(ctx, request, Some(id)).await?;
        Ok(incident.unwrap_or_default())
    }

    /// Create an incident and return it as stored by the server
    pub async fn create(
        &self,
        ctx: &Context,
        incident: &CreateIncidentRequest,
        options: &RequestOptions,
    ) -> Result<Incident> {
        validate_create(incident)?;

        let request = ApiRequest::post(["incident"])
            .json(serde_json::to_value(incident)?)
            .headers(&options.headers);
        let created: Option<Incident> = self.call(ctx, request, None).await?;
        let created = created.unwrap_or_default();
        debug!("Created incident {}", created.id);
        Ok(created)
    }

    /// Change the set fields of an incident
    pub async fn update(
        &self,
        ctx: &Context,
        id: &str,
        update: &UpdateIncidentRequest,
        options: &RequestOptions,
    ) -> Result<()> {
        validate_id(id)?;

        let body = serde_json::to_value(UpdateBody { id, fields: update })?;
        let request = ApiRequest::post(["incident", "update"])
            .json(body)
            .headers(&options.headers);
        self.call::<serde_json::Value>(ctx, request, Some(id)).await?;
        Ok(())
    }

    /// Close an incident with status `Done`
    pub async fn close(
        &self,
        ctx: &Context,
        id: &str,
        close: &CloseIncidentRequest,
        options: &RequestOptions,
    ) -> Result<()> {
        validate_id(id)?;

        let body = serde_json::to_value(CloseBody::new(id, close))?;
        let request = ApiRequest::post(["incident", "close"])
            .json(body)
            .headers(&options.headers);
        self.call::<serde_json::Value>(ctx, request, Some(id)).await?;
        Ok(())
    }

    /// Delete an incident
    pub async fn delete(&self, ctx: &Context, id: &str, options: &RequestOptions) -> Result<()> {
        validate_id(id)?;

        let body = serde_json::to_value(DeleteBody { ids: [id] })?;
        let request = ApiRequest::post(["incident", "batchDelete"])
            .json(body)
            .headers(&options.headers);
        self.call::<serde_json::Value>(ctx, request, Some(id)).await?;
        Ok(())
    }

    /// Send a request and map error statuses. A 404 is attributed to
    /// `incident_id` when the call targets a single incident.
    async fn call<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        request: ApiRequest,
        incident_id: Option<&str>,
    ) -> Result<Option<T>> {
        let (response, value) = self.http.send_json(ctx, request).await?;
        if !response.is_error() {
            return Ok(value);
        }

        let err = Error::from_response(
            response.status.as_u16(),
            &response.body,
            &response.headers,
        );
        Err(match (err, incident_id) {
            (Error::NotFound { api, .. }, Some(id)) => Error::NotFound {
                api,
                resource_type: Some(RESOURCE_TYPE.to_string()),
                resource_id: Some(id.to_string()),
            },
            (err, _) => err,
        })
    }
}

/// Page fetcher for one search
struct IncidentSearch {
    incidents: Incidents,
    filter: IncidentFilter,
    options: RequestOptions,
}

#[async_trait]
impl PageFetcher<Incident> for IncidentSearch {
    async fn fetch_page(&self, ctx: &Context, request: PageRequest) -> Result<IncidentPage> {
        self.incidents
            .search_page(ctx, &self.filter, request, &self.options)
            .await
    }
}

fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::validation("incident ID cannot be empty"));
    }
    Ok(())
}

fn validate_create(incident: &CreateIncidentRequest) -> Result<()> {
    if incident.name.is_empty() {
        return Err(Error::validation("incident name is required"));
    }
    if incident.incident_type.is_empty() {
        return Err(Error::validation("incident type is required"));
    }
    Ok(())
}
