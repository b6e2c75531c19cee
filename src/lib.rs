//! # ggg
//!
//! A bridge from Ganglia to Graphite.
//!
//! gmond and gmetad publish cluster state as one XML document per TCP
//! connection. This crate reads such a document, parses it into a
//! [`Snapshot`] and forwards every numeric metric to a carbon listener as a
//! plaintext-protocol line:
//!
//! ```text
//! <prefix><host>.<metric> <value> <timestamp>\n
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌────────────┐    ┌──────────┐
//! │  source  │───▶│  parser  │───▶│  forward   │───▶│   sink   │
//! │ tcp/file │    │ XML tree │    │ fan-out by │    │ tcp/     │
//! │          │    │          │    │ cluster/   │    │ stdout   │
//! │          │    │          │    │ host/metric│    │          │
//! └──────────┘    └──────────┘    └────────────┘    └──────────┘
//! ```
//!
//! - **[`source`]**: [`SnapshotSource`] trait with TCP, stream and file
//!   implementations, plus the XML parser
//! - **[`forward`]**: the concurrent [`Forwarder`] and its [`RunContext`]
//! - **[`sink`]**: the shared [`LineSink`] and [`Output`] selection
//! - **[`naming`]**: turns host names into single key segments
//! - **[`run`]**: one complete run, phase by phase
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Forward the local gmond state to a local carbon
//! ggg
//!
//! # Read from gmetad, write to a remote carbon under a custom prefix
//! ggg --ganglia-addr gmetad:8651 --carbon-addr graphite:2003 --prefix dc1.
//!
//! # Inspect a saved dump
//! ggg --file dump.xml --stdout
//! ```
//!
//! ### As a library
//!
//! ```
//! use std::io::Cursor;
//! use ggg::{Forwarder, LineSink, RunContext, SnapshotSource, StreamSource};
//!
//! # tokio_test::block_on(async {
//! let doc = r#"<GANGLIA_XML VERSION="3.7.2" SOURCE="gmond">
//!   <CLUSTER NAME="web">
//!     <HOST NAME="web.01">
//!       <METRIC NAME="load_one" VAL="0.5" TYPE="float"/>
//!       <METRIC NAME="os_name" VAL="Linux" TYPE="string"/>
//!     </HOST>
//!   </CLUSTER>
//! </GANGLIA_XML>"#;
//!
//! let snapshot = StreamSource::new(Cursor::new(doc), "inline").fetch().await.unwrap();
//!
//! let sink = LineSink::new(Vec::new());
//! let forwarder = Forwarder::new(RunContext::with_timestamp("ggg.", 1700000000), sink.clone());
//! forwarder.forward(snapshot).await.unwrap();
//! drop(forwarder);
//!
//! assert_eq!(sink.into_inner().unwrap(), b"ggg.web_01.load_one 0.5 1700000000\n");
//! # });
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod forward;
pub mod naming;
pub mod run;
pub mod sink;
pub mod source;

// Re-export main types for convenience
pub use error::{Error, ForwardError, ParseError};
pub use forward::{Forwarder, RunContext};
pub use run::{run, Input, RunOptions};
pub use sink::{BoxedWriter, LineSink, Output};
pub use source::{parse_snapshot, FileSource, SnapshotSource, StreamSource, TcpSource};

pub use ggg_types::{
    Cluster, ExtraElement, Grid, Host, Metric, MetricType, Snapshot, TEXTUAL_TYPE_TAG,
};
