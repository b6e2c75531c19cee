//! # ggg-types
//!
//! In-memory model of one Ganglia snapshot. A snapshot is a strict tree:
//!
//! ```text
//! Snapshot
//! ├── Grid* ── Cluster*
//! └── Cluster* ── Host* ── Metric* ── ExtraElement*
//! ```
//!
//! Every node owns its children, nothing is shared between parents and the
//! tree is never mutated after it has been built. Producers (the XML parser,
//! tests, library consumers) build it; the forwarding engine consumes it.
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: Serialization of the whole tree via serde
//!
//! ## Example
//!
//! ```rust
//! use ggg_types::{MetricType, Snapshot};
//!
//! let snapshot = Snapshot::builder()
//!     .source("gmond")
//!     .cluster("web", |c| {
//!         c.host("web.01", |h| {
//!             h.ip("10.0.0.1")
//!                 .metric("load_one", "0.5", MetricType::Float)
//!                 .metric("os_name", "Linux", MetricType::String)
//!         })
//!     })
//!     .build();
//!
//! assert_eq!(snapshot.metric_count(), 2);
//! assert_eq!(snapshot.numeric_metric_count(), 1);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod metric;
mod snapshot;
mod topology;

pub use metric::*;
pub use snapshot::*;
pub use topology::*;

/// Type tag Ganglia uses for textual metric values.
///
/// Metrics carrying this tag are never forwarded to a numeric sink.
pub const TEXTUAL_TYPE_TAG: &str = "string";
