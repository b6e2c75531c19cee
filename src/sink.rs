//! Output sinks for forwarded lines.
//!
//! All forwarding tasks share one [`LineSink`]. Every `write_line` call
//! writes a whole line while holding the sink's lock, so lines written from
//! different tasks never interleave.

use std::io;
use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::Error;

/// A boxed writer, used when the concrete sink is chosen at runtime.
pub type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Destination for forwarded lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Send lines to a carbon plaintext listener (host:port).
    Tcp(String),

    /// Write lines to standard output.
    Stdout,
}

impl Output {
    /// Create a TCP output.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ggg::Output;
    ///
    /// let output = Output::tcp("localhost:2003");
    /// ```
    pub fn tcp(addr: impl Into<String>) -> Self {
        Output::Tcp(addr.into())
    }

    /// Open the destination.
    pub async fn open(&self) -> Result<LineSink<BoxedWriter>, Error> {
        let writer: BoxedWriter = match self {
            Output::Tcp(addr) => {
                let stream =
                    TcpStream::connect(addr)
                        .await
                        .map_err(|source| Error::ConnectSink {
                            addr: addr.clone(),
                            source,
                        })?;
                info!(addr = %addr, "connected to carbon");
                Box::new(stream)
            }
            Output::Stdout => Box::new(tokio::io::stdout()),
        };
        Ok(LineSink::new(writer))
    }

    /// Returns a human-readable description of the destination.
    pub fn description(&self) -> String {
        match self {
            Output::Tcp(addr) => format!("tcp: {}", addr),
            Output::Stdout => "stdout".to_string(),
        }
    }
}

/// A cloneable, serialized, buffered line writer.
pub struct LineSink<W> {
    inner: Arc<Mutex<BufWriter<W>>>,
}

impl<W> std::fmt::Debug for LineSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineSink")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}

impl<W> Clone for LineSink<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W> LineSink<W>
where
    W: AsyncWrite + Send + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BufWriter::new(writer))),
        }
    }

    /// Write one complete line (including its trailing newline).
    pub async fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self.inner.lock().await;
        writer.write_all(line.as_bytes()).await
    }

    /// Push buffered lines to the underlying writer.
    pub async fn flush(&self) -> io::Result<()> {
        self.inner.lock().await.flush().await
    }

    /// Recover the writer once every other clone has been dropped.
    ///
    /// Lines still buffered are discarded; call [`flush`](Self::flush) first.
    pub fn into_inner(self) -> Option<W> {
        Arc::try_unwrap(self.inner)
            .ok()
            .map(|writer| writer.into_inner().into_inner())
    }
}
