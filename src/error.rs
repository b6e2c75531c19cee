//! Error types.
//!
//! [`Error`] is the run-level taxonomy: one variant per phase of a run, each
//! rendered with the phase name first so the operator can tell where a run
//! died. The phase-specific errors ([`ParseError`], [`ForwardError`]) carry
//! the detail.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that terminate a run.
#[derive(Debug, Error)]
pub enum Error {
    /// The snapshot source could not be reached.
    #[error("connect-source: failed to connect to {addr}: {source}")]
    ConnectSource {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The sink could not be reached.
    #[error("connect-sink: failed to connect to {addr}: {source}")]
    ConnectSink {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Reading the document from the source failed.
    #[error("read: failed to read snapshot from {from}: {source}")]
    Read {
        from: String,
        #[source]
        source: io::Error,
    },

    /// The document could not be turned into a snapshot.
    #[error("parse: {0}")]
    Parse(#[from] ParseError),

    /// A line could not be delivered to the sink.
    #[error("write: {0}")]
    Write(#[from] ForwardError),

    /// The parsed snapshot could not be exported.
    #[error("export: failed to write {path}: {message}")]
    Export { path: PathBuf, message: String },
}

/// Errors produced while decoding and parsing a snapshot document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The source sent nothing, or nothing but whitespace and prolog.
    #[error("document is empty")]
    Empty,

    /// The XML declaration names an encoding we do not know.
    #[error("unsupported encoding {0:?}")]
    UnsupportedEncoding(String),

    /// The bytes are not valid in the document's encoding.
    #[error("document is not valid {encoding}")]
    Decode { encoding: &'static str },

    /// Malformed markup.
    #[error("malformed XML at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// The document root is not a Ganglia document.
    #[error("unexpected root element <{0}>, expected <GANGLIA_XML>")]
    UnexpectedRoot(String),

    /// A required attribute is missing.
    #[error("<{element}> is missing required attribute {attribute}")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// The input ended while elements were still open.
    #[error("document truncated inside <{0}>")]
    Truncated(String),

    /// An element follows the closed root element.
    #[error("unexpected element <{0}> after the document root")]
    TrailingContent(String),
}

/// Errors produced while forwarding a snapshot to a sink.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The sink rejected a write or a flush.
    #[error("failed to write to sink: {0}")]
    Sink(#[source] io::Error),

    /// A forwarding task panicked or was cancelled.
    #[error("forwarding task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
