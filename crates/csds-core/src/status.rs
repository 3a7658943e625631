//! Per-client sync status summary.
//!
//! A pure formatting pass over a snapshot: one row per client with its id,
//! declared stream type and one `<CATEGORY> <STATUS>` line per config entry
//! that has both a status and a populated variant.

use std::fmt;

use serde::Serialize;

use crate::model::{ClientConfig, Snapshot};

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_CLIENTS: &str = "No xDS clients connected.";

const ID_WIDTH: usize = 50;
const TYPE_WIDTH: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub client_id: String,
    pub stream_type: String,
    /// Empty when the client reported entries but none carried a status.
    pub config_status: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub connected: bool,
    pub rows: Vec<StatusRow>,
}

/// Build the status report for a snapshot.
///
/// Clients without a node identity and without entries produce no row.
pub fn summarize(snapshot: &Snapshot) -> StatusReport {
    StatusReport {
        connected: !snapshot.is_empty(),
        rows: snapshot.clients.iter().filter_map(row).collect(),
    }
}

fn row(client: &ClientConfig) -> Option<StatusRow> {
    let config_status = if client.entries.is_empty() {
        client.node.as_ref()?;
        vec![NOT_AVAILABLE.to_string()]
    } else {
        client
            .entries
            .iter()
            .filter_map(|e| Some(format!("{} {}", e.kind()?, e.status?)))
            .collect()
    };

    Some(StatusRow {
        client_id: client.id().to_string(),
        stream_type: client.stream_type().to_string(),
        config_status,
    })
}

impl StatusReport {
    /// Column-aligned table, one line per status entry.
    pub fn render(&self) -> String {
        if !self.connected {
            return format!("{NO_CLIENTS}\n");
        }

        let mut out = String::new();
        push_line(&mut out, "Client ID", "xDS stream type", "Config Status");
        for row in &self.rows {
            match row.config_status.split_first() {
                None => push_line(&mut out, &row.client_id, &row.stream_type, ""),
                Some((first, rest)) => {
                    push_line(&mut out, &row.client_id, &row.stream_type, first);
                    for s in rest {
                        push_line(&mut out, "", "", s);
                    }
                }
            }
        }
        out
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn push_line(out: &mut String, id: &str, stream_type: &str, status: &str) {
    let line = format!(
        "{:<iw$} {:<tw$} {}",
        id,
        stream_type,
        status,
        iw = ID_WIDTH,
        tw = TYPE_WIDTH
    );
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report(v: serde_json::Value) -> StatusReport {
        summarize(&Snapshot::from_json(&v).unwrap())
    }

    #[test]
    fn no_clients() {
        assert_eq!(report(json!({})).render(), "No xDS clients connected.\n");
    }

    #[test]
    fn client_without_entries_is_not_available() {
        let r = report(json!({ "config": [{
            "node": { "id": "n1", "metadata": { "XDS_STREAM_TYPE": "ADS" } }
        }]}));
        assert_eq!(r.rows[0].config_status, vec!["N/A"]);
        let rendered = r.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[1], format!("{:<50} {:<30} N/A", "n1", "ADS"));
    }

    #[test]
    fn one_line_per_status() {
        let r = report(json!({ "config": [{
            "node": { "id": "n1" },
            "xdsConfig": [
                { "status": "SYNCED", "listenerConfig": {} },
                { "status": "STALE", "routeConfig": {} },
                { "clusterConfig": {} },
                { "status": "ERROR", "scopedRouteConfig": {} }
            ]
        }]}));
        assert_eq!(r.rows[0].config_status, vec!["LDS SYNCED", "RDS STALE", "SRDS ERROR"]);

        let out = r.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("n1 "));
        assert!(lines[1].ends_with("LDS SYNCED"));
        assert_eq!(lines[2], format!("{:<50} {:<30} RDS STALE", "", ""));
    }

    #[test]
    fn entries_without_status_leave_column_blank() {
        let r = report(json!({ "config": [{
            "node": { "id": "n1" },
            "xdsConfig": [{ "listenerConfig": {} }]
        }]}));
        assert!(r.rows[0].config_status.is_empty());
        let out = r.render();
        assert_eq!(out.lines().nth(1), Some("n1"));
    }

    #[test]
    fn header_is_column_aligned() {
        let r = report(json!({ "config": [{ "node": { "id": "n" } }] }));
        let header = r.render().lines().next().map(str::to_string);
        assert_eq!(
            header,
            Some(format!("{:<50} {:<30} Config Status", "Client ID", "xDS stream type"))
        );
    }

    #[test]
    fn nodeless_empty_client_has_no_row() {
        let r = report(json!({ "config": [{ "xdsConfig": [] }] }));
        assert!(r.connected);
        assert!(r.rows.is_empty());
    }
}
