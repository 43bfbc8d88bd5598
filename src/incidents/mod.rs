//! Incident models and operations
//!
//! ```rust,ignore
//! use xsoar_client::{Client, ClientConfig, Context, RequestOptions};
//! use xsoar_client::incidents::{IncidentFilter, IncidentStatus};
//! use futures::StreamExt;
//!
//! let client = Client::new(ClientConfig::from_env()?)?;
//! let filter = IncidentFilter::new().status(IncidentStatus::Active);
//! let mut incidents = client
//!     .incidents()
//!     .search(&Context::new(), filter, &RequestOptions::new());
//!
//! while let Some(incident) = incidents.next().await {
//!     let incident = incident?;
//!     println!("{} {}", incident.id, incident.name);
//! }
//! ```

mod models;
mod service;

pub use models::{
    CloseIncidentRequest, CreateIncidentRequest, Incident, IncidentFilter, IncidentPage,
    IncidentStatus, Label, Severity, UpdateIncidentRequest,
};
pub use service::Incidents;
