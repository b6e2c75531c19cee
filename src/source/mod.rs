//! Snapshot sources.
//!
//! A source produces exactly one fully parsed [`Snapshot`] per run. Sources
//! never hand out partial trees: either the whole document parsed or the
//! fetch fails.

mod decode;
mod file;
mod stream;
mod xml;

pub use decode::decode_document;
pub use file::FileSource;
pub use stream::{StreamSource, TcpSource};
pub use xml::{parse_snapshot, parse_str};

use std::fmt::Debug;

use async_trait::async_trait;
use ggg_types::Snapshot;

use crate::error::Error;

/// Trait for reading one snapshot document from somewhere.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use ggg::{SnapshotSource, StreamSource};
///
/// # tokio_test::block_on(async {
/// let doc = r#"<GANGLIA_XML><CLUSTER NAME="c"/></GANGLIA_XML>"#;
/// let mut source = StreamSource::new(Cursor::new(doc), "inline");
/// let snapshot = source.fetch().await.unwrap();
/// assert_eq!(snapshot.cluster_count(), 1);
/// # });
/// ```
#[async_trait]
pub trait SnapshotSource: Send + Debug {
    /// Read the complete document and parse it.
    ///
    /// Blocks until the source has sent everything (end of stream or end of
    /// file).
    async fn fetch(&mut self) -> Result<Snapshot, Error>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}
