//! Snapshot - the root of one parsed monitoring document.

use alloc::string::String;
use alloc::vec::Vec;

use crate::{Cluster, ClusterBuilder, Grid, GridBuilder};

/// A complete, immutable view of one Ganglia read.
///
/// Grids and root-level clusters are siblings; a document from gmond usually
/// carries only clusters, one from gmetad usually only grids. Either list
/// may be empty, and a snapshot with no clusters at all is valid.
///
/// # Example
///
/// ```rust
/// use ggg_types::{MetricType, Snapshot};
///
/// let snapshot = Snapshot::builder()
///     .grid("emea", |g| {
///         g.cluster("db", |c| c.host("db1", |h| h.metric("load_one", "0.1", MetricType::Float)))
///     })
///     .cluster("web", |c| c.host("web1", |h| h.metric("load_one", "0.7", MetricType::Float)))
///     .build();
///
/// assert_eq!(snapshot.cluster_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// Version of the daemon that produced the document.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub version: Option<String>,

    /// Producer of the document, `gmond` or `gmetad`.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub source: Option<String>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub grids: Vec<Grid>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub clusters: Vec<Cluster>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for constructing snapshots.
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::new()
    }

    /// True if no cluster is reachable from the root.
    pub fn is_empty(&self) -> bool {
        self.cluster_count() == 0
    }

    /// Iterate over every cluster: root-level first, then grid by grid.
    pub fn all_clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters
            .iter()
            .chain(self.grids.iter().flat_map(|g| g.clusters.iter()))
    }

    pub fn cluster_count(&self) -> usize {
        self.all_clusters().count()
    }

    pub fn host_count(&self) -> usize {
        self.all_clusters().map(|c| c.hosts.len()).sum()
    }

    pub fn metric_count(&self) -> usize {
        self.all_clusters().map(|c| c.metric_count()).sum()
    }

    /// Number of metrics a numeric sink receives from this snapshot.
    pub fn numeric_metric_count(&self) -> usize {
        self.all_clusters()
            .flat_map(|c| c.hosts.iter())
            .map(|h| h.numeric_metrics().count())
            .sum()
    }
}

/// Builder for constructing [`Snapshot`] instances.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.snapshot.version = Some(version.into());
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.snapshot.source = Some(source.into());
        self
    }

    /// Add a grid built using a closure.
    pub fn grid<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(GridBuilder) -> GridBuilder,
    {
        self.snapshot.grids.push(f(GridBuilder::new(name)).build());
        self
    }

    /// Add a root-level cluster built using a closure.
    pub fn cluster<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(ClusterBuilder) -> ClusterBuilder,
    {
        self.snapshot
            .clusters
            .push(f(ClusterBuilder::new(name)).build());
        self
    }

    /// Add a pre-built root-level cluster.
    pub fn cluster_node(mut self, cluster: Cluster) -> Self {
        self.snapshot.clusters.push(cluster);
        self
    }

    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetricType;

    fn sample() -> Snapshot {
        Snapshot::builder()
            .version("3.7.2")
            .source("gmetad")
            .cluster("root", |c| {
                c.host("a", |h| {
                    h.metric("load_one", "0.5", MetricType::Float)
                        .metric("os_name", "Linux", MetricType::String)
                })
            })
            .grid("g1", |g| {
                g.cluster("c1", |c| {
                    c.host("b", |h| h.metric("cpu_num", "4", MetricType::Uint16))
                        .host("c", |h| h)
                })
                .cluster("c2", |c| c)
            })
            .build()
    }

    #[test]
    fn test_snapshot_counts() {
        let snapshot = sample();
        assert_eq!(snapshot.cluster_count(), 3);
        assert_eq!(snapshot.host_count(), 3);
        assert_eq!(snapshot.metric_count(), 3);
        assert_eq!(snapshot.numeric_metric_count(), 2);
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn test_all_clusters_order() {
        let snapshot = sample();
        let names: Vec<&str> = snapshot.all_clusters().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["root", "c1", "c2"]);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::new();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.numeric_metric_count(), 0);

        // Grids without clusters are still empty
        let snapshot = Snapshot::builder().grid("g", |g| g).build();
        assert!(snapshot.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let snapshot = sample();
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, parsed);
    }
}
