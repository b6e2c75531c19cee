//! JSON export of a parsed snapshot.
//!
//! Writes a summary block followed by the full tree, for inspecting what
//! a source reports without forwarding anything.

use std::path::Path;

use ggg_types::Snapshot;
use serde_json::json;

use crate::error::Error;

/// Render `snapshot` as pretty-printed JSON.
pub fn to_json(snapshot: &Snapshot) -> Result<String, serde_json::Error> {
    let export = json!({
        "summary": {
            "grids": snapshot.grids.len(),
            "clusters": snapshot.cluster_count(),
            "hosts": snapshot.host_count(),
            "metrics": snapshot.metric_count(),
            "numeric_metrics": snapshot.numeric_metric_count(),
        },
        "snapshot": snapshot,
    });
    serde_json::to_string_pretty(&export)
}

/// Write `snapshot` as JSON to `path`, replacing any existing file.
pub async fn write_json(snapshot: &Snapshot, path: &Path) -> Result<(), Error> {
    let export_error = |message: String| Error::Export {
        path: path.to_path_buf(),
        message,
    };

    let json = to_json(snapshot).map_err(|e| export_error(e.to_string()))?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| export_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ggg_types::MetricType;

    fn sample() -> Snapshot {
        Snapshot::builder()
            .source("gmond")
            .cluster("web", |c| {
                c.host("web01", |h| {
                    h.metric("load_one", "0.5", MetricType::Float)
                        .metric("os_name", "Linux", MetricType::String)
                })
            })
            .build()
    }

    #[test]
    fn test_to_json_summary() {
        let json = to_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["summary"]["clusters"], 1);
        assert_eq!(value["summary"]["hosts"], 1);
        assert_eq!(value["summary"]["metrics"], 2);
        assert_eq!(value["summary"]["numeric_metrics"], 1);
        assert_eq!(value["snapshot"]["source"], "gmond");
    }

    #[test]
    fn test_to_json_tree_reads_back() {
        let snapshot = sample();
        let json = to_json(&snapshot).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let back: Snapshot = serde_json::from_value(value["snapshot"].clone()).unwrap();
        assert_eq!(back, snapshot);
    }

    #[tokio::test]
    async fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        write_json(&sample(), &path).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"load_one\""));
    }

    #[tokio::test]
    async fn test_write_json_bad_path() {
        let err = write_json(&sample(), Path::new("/nonexistent/dir/out.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Export { .. }));
        assert!(err.to_string().starts_with("export:"));
    }
}
