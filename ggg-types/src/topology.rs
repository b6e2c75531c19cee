//! Grid, cluster and host nodes.

use alloc::string::String;
use alloc::vec::Vec;

use crate::{Metric, MetricType};

/// An optional grouping of clusters, emitted by gmetad.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    pub name: String,

    /// URL of the gmetad that is authoritative for this grid.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub authority: Option<String>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub localtime: Option<String>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub clusters: Vec<Cluster>,
}

impl Grid {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn builder(name: impl Into<String>) -> GridBuilder {
        GridBuilder::new(name)
    }
}

/// A named collection of hosts.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cluster {
    pub name: String,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub owner: Option<String>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub latlong: Option<String>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub url: Option<String>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub localtime: Option<String>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub hosts: Vec<Host>,
}

impl Cluster {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn builder(name: impl Into<String>) -> ClusterBuilder {
        ClusterBuilder::new(name)
    }

    /// Total metrics across all hosts of this cluster.
    pub fn metric_count(&self) -> usize {
        self.hosts.iter().map(|h| h.metrics.len()).sum()
    }
}

/// One monitored machine.
///
/// The name is the only part of the host that reaches the sink. It is kept
/// exactly as reported, including an empty name.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Host {
    pub name: String,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub ip: Option<String>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub location: Option<String>,

    /// Unix time of the last heartbeat from this host.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub reported: Option<String>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub tn: Option<String>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub tmax: Option<String>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub dmax: Option<String>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub gmond_started: Option<String>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub metrics: Vec<Metric>,
}

impl Host {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn builder(name: impl Into<String>) -> HostBuilder {
        HostBuilder::new(name)
    }

    /// Iterate over the metrics that are forwarded to a numeric sink.
    pub fn numeric_metrics(&self) -> impl Iterator<Item = &Metric> {
        self.metrics.iter().filter(|m| m.is_numeric())
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Builder for [`Grid`].
#[derive(Debug)]
pub struct GridBuilder {
    grid: Grid,
}

impl GridBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            grid: Grid::new(name),
        }
    }

    pub fn authority(mut self, authority: impl Into<String>) -> Self {
        self.grid.authority = Some(authority.into());
        self
    }

    /// Add a cluster built using a closure.
    pub fn cluster<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(ClusterBuilder) -> ClusterBuilder,
    {
        self.grid.clusters.push(f(ClusterBuilder::new(name)).build());
        self
    }

    pub fn build(self) -> Grid {
        self.grid
    }
}

/// Builder for [`Cluster`].
#[derive(Debug)]
pub struct ClusterBuilder {
    cluster: Cluster,
}

impl ClusterBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            cluster: Cluster::new(name),
        }
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.cluster.owner = Some(owner.into());
        self
    }

    /// Add a host built using a closure.
    pub fn host<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(HostBuilder) -> HostBuilder,
    {
        self.cluster.hosts.push(f(HostBuilder::new(name)).build());
        self
    }

    /// Add a pre-built host.
    pub fn host_node(mut self, host: Host) -> Self {
        self.cluster.hosts.push(host);
        self
    }

    pub fn build(self) -> Cluster {
        self.cluster
    }
}

/// Builder for [`Host`].
#[derive(Debug)]
pub struct HostBuilder {
    host: Host,
}

impl HostBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            host: Host::new(name),
        }
    }

    pub fn ip(mut self, ip: impl Into<String>) -> Self {
        self.host.ip = Some(ip.into());
        self
    }

    /// Add a metric with its forwarded attributes.
    pub fn metric(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        kind: MetricType,
    ) -> Self {
        self.host.metrics.push(Metric::new(name, value, kind));
        self
    }

    /// Add a pre-built metric.
    pub fn metric_node(mut self, metric: Metric) -> Self {
        self.host.metrics.push(metric);
        self
    }

    pub fn build(self) -> Host {
        self.host
    }
}
