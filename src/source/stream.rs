//! Stream-based snapshot sources.
//!
//! gmond and gmetad answer every TCP connection with one complete XML dump
//! and then close it; connecting is the request. [`StreamSource`] reads any
//! async byte stream to its end and parses the result, [`TcpSource`] opens
//! the connection for it.

use async_trait::async_trait;
use ggg_types::Snapshot;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::TcpStream;
use tracing::{debug, info};

use super::{parse_snapshot, SnapshotSource};
use crate::error::Error;

/// A source that reads one document from an async reader.
#[derive(Debug)]
pub struct StreamSource<R> {
    reader: R,
    description: String,
}

impl<R> StreamSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    /// Wrap a reader that yields one complete document.
    pub fn new(reader: R, description: &str) -> Self {
        Self {
            reader,
            description: format!("stream: {}", description),
        }
    }
}

#[async_trait]
impl<R> SnapshotSource for StreamSource<R>
where
    R: AsyncRead + Unpin + Send + std::fmt::Debug,
{
    async fn fetch(&mut self) -> Result<Snapshot, Error> {
        let mut document = Vec::new();
        self.reader
            .read_to_end(&mut document)
            .await
            .map_err(|source| Error::Read {
                from: self.description.clone(),
                source,
            })?;
        debug!(bytes = document.len(), source = %self.description, "read snapshot document");

        Ok(parse_snapshot(&document)?)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// A TCP connection to gmond or gmetad.
pub type TcpSource = StreamSource<TcpStream>;

impl StreamSource<TcpStream> {
    /// Connect to a gmond/gmetad XML port.
    pub async fn connect(addr: &str) -> Result<Self, Error> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| Error::ConnectSource {
                addr: addr.to_string(),
                source,
            })?;
        info!(addr, "connected to snapshot source");
        Ok(Self::new(stream, addr))
    }
}
