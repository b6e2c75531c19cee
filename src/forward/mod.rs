//! The forwarding engine.
//!
//! Walks a [`Snapshot`] and writes one plaintext line per numeric metric to
//! a [`LineSink`]. Work fans out in three tiers: one task per cluster, one
//! per host within a cluster, one per metric within a host. Each scope joins
//! all of its children before it completes, so [`Forwarder::forward`]
//! returns only once every line has been written.
//!
//! Siblings run concurrently and write in any order; only the set of lines
//! is fixed. The tree is consumed as it is walked: each task owns the node
//! it was handed.
//!
//! The first write failure ends the run. The failing scope returns early,
//! and dropping its task set aborts every task still running under it, up
//! to the root.

mod context;

pub use context::RunContext;

use std::sync::Arc;

use ggg_types::{Cluster, Host, Metric, Snapshot};
use tokio::io::AsyncWrite;
use tokio::task::JoinSet;
use tracing::{debug, debug_span, trace, Instrument};

use crate::error::ForwardError;
use crate::naming::sanitize_segment;
use crate::sink::LineSink;

type Tasks = JoinSet<Result<(), ForwardError>>;

/// Forwards snapshots to one sink under one run context.
///
/// # Example
///
/// ```
/// use ggg::{Forwarder, LineSink, MetricType, RunContext, Snapshot};
///
/// # tokio_test::block_on(async {
/// let snapshot = Snapshot::builder()
///     .cluster("web", |c| c.host("web.01", |h| h.metric("load", "0.5", MetricType::Float)))
///     .build();
///
/// let sink = LineSink::new(Vec::new());
/// let forwarder = Forwarder::new(RunContext::with_timestamp("ggg.", 1700000000), sink.clone());
/// forwarder.forward(snapshot).await.unwrap();
/// drop(forwarder);
///
/// let written = sink.into_inner().unwrap();
/// assert_eq!(written, b"ggg.web_01.load 0.5 1700000000\n");
/// # });
/// ```
#[derive(Debug)]
pub struct Forwarder<W> {
    ctx: Arc<RunContext>,
    sink: LineSink<W>,
}

impl<W> Forwarder<W>
where
    W: AsyncWrite + Send + Unpin + 'static,
{
    pub fn new(ctx: RunContext, sink: LineSink<W>) -> Self {
        Self {
            ctx: Arc::new(ctx),
            sink,
        }
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Write every numeric metric of `snapshot` and flush the sink.
    pub async fn forward(&self, snapshot: Snapshot) -> Result<(), ForwardError> {
        let Snapshot {
            grids, clusters, ..
        } = snapshot;

        // Root-level clusters run alongside the grids and are drained last.
        let root = self.dispatch(clusters);

        for grid in grids {
            debug!(grid = %grid.name, clusters = grid.clusters.len(), "forwarding grid");
            drain(self.dispatch(grid.clusters)).await?;
        }
        drain(root).await?;

        self.sink.flush().await.map_err(ForwardError::Sink)
    }

    /// Start one task per cluster.
    fn dispatch(&self, clusters: Vec<Cluster>) -> Tasks {
        let mut tasks = JoinSet::new();
        for cluster in clusters {
            let span = debug_span!("cluster", name = %cluster.name);
            tasks.spawn(
                forward_cluster(Arc::clone(&self.ctx), self.sink.clone(), cluster)
                    .instrument(span),
            );
        }
        tasks
    }
}

async fn forward_cluster<W>(
    ctx: Arc<RunContext>,
    sink: LineSink<W>,
    cluster: Cluster,
) -> Result<(), ForwardError>
where
    W: AsyncWrite + Send + Unpin + 'static,
{
    debug!(hosts = cluster.hosts.len(), "reading hosts");

    let mut tasks = JoinSet::new();
    for host in cluster.hosts {
        let span = debug_span!("host", name = %host.name);
        tasks.spawn(forward_host(Arc::clone(&ctx), sink.clone(), host).instrument(span));
    }
    drain(tasks).await
}

async fn forward_host<W>(
    ctx: Arc<RunContext>,
    sink: LineSink<W>,
    host: Host,
) -> Result<(), ForwardError>
where
    W: AsyncWrite + Send + Unpin + 'static,
{
    let segment: Arc<str> = Arc::from(sanitize_segment(&host.name));
    debug!(metrics = host.metrics.len(), "reading metrics");

    let mut tasks = JoinSet::new();
    for metric in host.metrics {
        tasks.spawn(forward_metric(
            Arc::clone(&ctx),
            sink.clone(),
            Arc::clone(&segment),
            metric,
        ));
    }
    drain(tasks).await
}

async fn forward_metric<W>(
    ctx: Arc<RunContext>,
    sink: LineSink<W>,
    host: Arc<str>,
    metric: Metric,
) -> Result<(), ForwardError>
where
    W: AsyncWrite + Send + Unpin + 'static,
{
    if !metric.is_numeric() {
        trace!(metric = %metric.name, "skipping textual metric");
        return Ok(());
    }

    let line = ctx.format_line(&host, &metric.name, &metric.value);
    sink.write_line(&line).await.map_err(ForwardError::Sink)
}

/// Wait for every task of a scope; stop at the first failure.
///
/// Returning early drops `tasks`, which aborts the ones still running.
async fn drain(mut tasks: Tasks) -> Result<(), ForwardError> {
    while let Some(joined) = tasks.join_next().await {
        joined??;
    }
    Ok(())
}
