//! The run driver.
//!
//! One run moves one snapshot: capture the snapshot time, connect to the
//! source, connect to the sink, read and parse the document, forward it,
//! flush. Any failure ends the run with the [`Error`] of the phase that
//! failed. Export runs stop after parsing and never touch the sink.

use std::path::PathBuf;

use ggg_types::Snapshot;
use tracing::{info, info_span, Instrument};

use crate::error::Error;
use crate::export;
use crate::forward::{Forwarder, RunContext};
use crate::sink::Output;
use crate::source::{FileSource, SnapshotSource, TcpSource};

/// Where the snapshot document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A gmond/gmetad XML port (host:port).
    Tcp(String),

    /// A saved document.
    File(PathBuf),
}

impl Input {
    /// Connect to (or open) the source.
    pub async fn open(&self) -> Result<Box<dyn SnapshotSource>, Error> {
        let source: Box<dyn SnapshotSource> = match self {
            Input::Tcp(addr) => Box::new(TcpSource::connect(addr).await?),
            Input::File(path) => Box::new(FileSource::new(path)),
        };
        Ok(source)
    }
}

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: Input,
    pub output: Output,
    /// Key prefix, including its trailing separator.
    pub prefix: String,
    /// Write the parsed snapshot here as JSON instead of forwarding it.
    pub export: Option<PathBuf>,
}

/// Execute one run.
pub async fn run(opts: RunOptions) -> Result<(), Error> {
    let ctx = RunContext::new(opts.prefix);
    let mut source = opts.input.open().await?;

    if let Some(path) = opts.export {
        let snapshot = fetch(source.as_mut()).await?;
        export::write_json(&snapshot, &path).await?;
        info!(path = %path.display(), "exported snapshot");
        return Ok(());
    }

    let sink = opts.output.open().await?;
    let snapshot = fetch(source.as_mut()).await?;
    let lines = snapshot.numeric_metric_count();

    let span = info_span!("forward", sink = %opts.output.description());
    Forwarder::new(ctx, sink)
        .forward(snapshot)
        .instrument(span)
        .await?;

    info!(lines, "forwarded snapshot");
    Ok(())
}

async fn fetch(source: &mut dyn SnapshotSource) -> Result<Snapshot, Error> {
    let snapshot = source.fetch().await?;
    info!(
        source = source.description(),
        clusters = snapshot.cluster_count(),
        hosts = snapshot.host_count(),
        metrics = snapshot.metric_count(),
        numeric = snapshot.numeric_metric_count(),
        "parsed snapshot"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use std::collections::HashSet;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/gmetad.xml");

    /// Serve `document` once, then close.
    async fn serve_document(document: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            stream.write_all(&document).await.unwrap();
        });
        addr
    }

    /// Accept one connection and collect everything written to it.
    async fn collect_lines() -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut received = String::new();
            stream.read_to_string(&mut received).await.unwrap();
            received
        });
        (addr, handle)
    }

    async fn unused_addr() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().to_string()
    }

    fn keys_and_values(received: &str) -> HashSet<(String, String)> {
        received
            .lines()
            .map(|line| {
                let fields: Vec<&str> = line.split(' ').collect();
                assert_eq!(fields.len(), 3, "malformed line {line:?}");
                (fields[0].to_string(), fields[1].to_string())
            })
            .collect()
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let document = std::fs::read(FIXTURE).unwrap();
        let ganglia = serve_document(document).await;
        let (carbon, received) = collect_lines().await;

        run(RunOptions {
            input: Input::Tcp(ganglia),
            output: Output::tcp(carbon),
            prefix: "ggg.".to_string(),
            export: None,
        })
        .await
        .unwrap();

        let received = received.await.unwrap();
        let expected: HashSet<(String, String)> = [
            ("ggg.web01_example_com.load_one", "0.52"),
            ("ggg.web01_example_com.cpu_num", "4"),
            ("ggg.web01_example_com.boottime", "1699990000"),
            ("ggg.web02_example_com.load_one", "1.05"),
            ("ggg.web02_example_com.mem_free", "1024000"),
            ("ggg.db-1.disk_free", "512.334"),
            ("ggg.db-1.proc_run", "2"),
            ("ggg.edge_cdn_local.bytes_in", "3471.21"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        assert_eq!(received.lines().count(), 8);
        assert_eq!(keys_and_values(&received), expected);

        let stamps: HashSet<&str> = received
            .lines()
            .filter_map(|line| line.rsplit(' ').next())
            .collect();
        assert_eq!(stamps.len(), 1);
    }

    #[tokio::test]
    async fn test_run_from_file() {
        let (carbon, received) = collect_lines().await;

        run(RunOptions {
            input: Input::File(PathBuf::from(FIXTURE)),
            output: Output::tcp(carbon),
            prefix: String::new(),
            export: None,
        })
        .await
        .unwrap();

        let received = received.await.unwrap();
        assert_eq!(received.lines().count(), 8);
        assert!(received.lines().any(|l| l.starts_with("db-1.proc_run 2 ")));
    }

    #[tokio::test]
    async fn test_run_source_unreachable() {
        let err = run(RunOptions {
            input: Input::Tcp(unused_addr().await),
            output: Output::Stdout,
            prefix: "ggg.".to_string(),
            export: None,
        })
        .await
        .unwrap_err();

        assert!(matches!(err, Error::ConnectSource { .. }));
    }

    #[tokio::test]
    async fn test_run_sink_unreachable() {
        let ganglia = serve_document(b"<GANGLIA_XML/>".to_vec()).await;

        let err = run(RunOptions {
            input: Input::Tcp(ganglia),
            output: Output::tcp(unused_addr().await),
            prefix: "ggg.".to_string(),
            export: None,
        })
        .await
        .unwrap_err();

        assert!(matches!(err, Error::ConnectSink { .. }));
    }

    #[tokio::test]
    async fn test_run_malformed_document_writes_nothing() {
        let document = br#"<GANGLIA_XML><CLUSTER NAME="c"><HOST NAME="h">
<METRIC NAME="m" VAL="1" TYPE="float"/>"#;
        let ganglia = serve_document(document.to_vec()).await;
        let (carbon, received) = collect_lines().await;

        let err = run(RunOptions {
            input: Input::Tcp(ganglia),
            output: Output::tcp(carbon),
            prefix: "ggg.".to_string(),
            export: None,
        })
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Parse(ParseError::Truncated(_))));
        assert_eq!(received.await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_run_export_skips_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        run(RunOptions {
            input: Input::File(PathBuf::from(FIXTURE)),
            // Nobody listens here; export mode must not connect
            output: Output::tcp(unused_addr().await),
            prefix: "ggg.".to_string(),
            export: Some(path.clone()),
        })
        .await
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["summary"]["clusters"], 3);
        assert_eq!(value["summary"]["numeric_metrics"], 8);
    }
}
