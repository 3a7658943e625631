use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use csds_core::model::Snapshot;

/// Read a saved `ClientStatusResponse` and decode it.
pub fn read_snapshot<P: AsRef<Path>>(path: P) -> Result<Snapshot> {
    let path = path.as_ref();
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let v: serde_json::Value = serde_json::from_slice(&raw)
        .map_err(|e| anyhow!("invalid json in {}: {e}", path.display()))?;
    Ok(Snapshot::from_json(&v)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_saved_response() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("resp.json");
        fs::write(&p, r#"{"config": [{"node": {"id": "n1"}}]}"#).unwrap();
        let snap = read_snapshot(&p).unwrap();
        assert_eq!(snap.clients[0].id(), "n1");
    }

    #[test]
    fn missing_file_names_path() {
        let err = read_snapshot("/nonexistent/resp.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/resp.json"));
    }
}
