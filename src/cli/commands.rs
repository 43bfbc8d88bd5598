//! CLI commands and argument parsing

use crate::config::{ENV_API_KEY, ENV_BASE_URL, ENV_KEY_ID};
use crate::incidents::{IncidentStatus, Severity};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line client for the XSOAR incident API
#[derive(Parser, Debug)]
#[command(name = "xsoar")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API base URL
    #[arg(long, global = true, env = ENV_BASE_URL)]
    pub base_url: Option<String>,

    /// API key ID
    #[arg(long, global = true, env = ENV_KEY_ID)]
    pub key_id: Option<String>,

    /// API key
    #[arg(long, global = true, env = ENV_API_KEY, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Configuration file (YAML); flags and environment take precedence
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search incidents (pages are fetched as results are printed)
    Search {
        /// Lucene-style query
        #[arg(short, long)]
        query: Option<String>,

        /// Status filter (comma-separated)
        #[arg(long, value_delimiter = ',')]
        status: Vec<IncidentStatus>,

        /// Severity filter by name or number (comma-separated)
        #[arg(long, value_delimiter = ',')]
        severity: Vec<Severity>,

        /// Incident type filter (comma-separated)
        #[arg(long = "type", value_delimiter = ',')]
        incident_type: Vec<String>,

        /// Owner filter (comma-separated)
        #[arg(long, value_delimiter = ',')]
        owner: Vec<String>,

        /// Stop after this many incidents
        #[arg(short, long)]
        limit: Option<usize>,

        /// Incidents per request (1-1000)
        #[arg(long, default_value = "100")]
        page_size: i64,
    },

    /// Show one incident
    Get {
        /// Incident ID
        id: String,
    },

    /// Create an incident
    Create {
        /// Incident name
        #[arg(long)]
        name: String,

        /// Incident type
        #[arg(long = "type")]
        incident_type: String,

        /// Severity by name or number
        #[arg(long)]
        severity: Option<Severity>,

        /// Owner
        #[arg(long)]
        owner: Option<String>,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Custom field as KEY=VALUE (VALUE is parsed as JSON when possible)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, serde_json::Value)>,
    },

    /// Update fields of an incident
    Update {
        /// Incident ID
        id: String,

        /// New severity
        #[arg(long)]
        severity: Option<Severity>,

        /// New owner
        #[arg(long)]
        owner: Option<String>,

        /// New status
        #[arg(long)]
        status: Option<IncidentStatus>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// Custom field as KEY=VALUE (VALUE is parsed as JSON when possible)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, serde_json::Value)>,
    },

    /// Close an incident
    Close {
        /// Incident ID
        id: String,

        /// Close reason
        #[arg(long, default_value = "Resolved")]
        reason: String,

        /// Close notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete an incident
    Delete {
        /// Incident ID
        id: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Indented JSON
    Pretty,
}

fn parse_field(raw: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty field name in '{raw}'"));
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["xsoar", "--base-url", "https://x.example.com"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_search() {
        let cli = parse(&[
            "search",
            "--query",
            "name:phish*",
            "--status",
            "active,pending",
            "--severity",
            "high,5",
            "--limit",
            "20",
            "--page-size",
            "50",
        ]);

        match cli.command {
            Commands::Search {
                query,
                status,
                severity,
                limit,
                page_size,
                ..
            } => {
                assert_eq!(query.as_deref(), Some("name:phish*"));
                assert_eq!(status, vec![IncidentStatus::Active, IncidentStatus::Pending]);
                assert_eq!(severity, vec![Severity::High, Severity::Critical]);
                assert_eq!(limit, Some(20));
                assert_eq!(page_size, 50);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = parse(&["get", "42", "--format", "pretty", "--timeout", "5", "-v"]);
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert_eq!(cli.timeout, Some(5));
        assert!(cli.verbose);
        assert_eq!(cli.base_url.as_deref(), Some("https://x.example.com"));
    }

    #[test]
    fn test_parse_create_fields() {
        let cli = parse(&[
            "create",
            "--name",
            "Alert",
            "--type",
            "Malware",
            "--field",
            "count=3",
            "--field",
            "host=srv-01",
        ]);

        match cli.command {
            Commands::Create {
                name,
                incident_type,
                fields,
                ..
            } => {
                assert_eq!(name, "Alert");
                assert_eq!(incident_type, "Malware");
                assert_eq!(
                    fields,
                    vec![
                        ("count".to_string(), json!(3)),
                        ("host".to_string(), json!("srv-01")),
                    ]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_close_default_reason() {
        let cli = parse(&["close", "7"]);
        match cli.command {
            Commands::Close { id, reason, notes } => {
                assert_eq!(id, "7");
                assert_eq!(reason, "Resolved");
                assert!(notes.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_severity() {
        let result = Cli::try_parse_from(["xsoar", "search", "--severity", "severe"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_field_errors() {
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
        assert_eq!(parse_field("a=").unwrap(), ("a".to_string(), json!("")));
    }
}
