//! Ganglia XML parser.
//!
//! Turns one complete gmond/gmetad document into a [`Snapshot`]. The parser
//! walks `quick-xml` events and keeps a stack of partially built nodes; a
//! node is attached to its parent when its end tag is seen, so sibling
//! order is document order. Nothing is returned unless the whole document
//! parsed.

use ggg_types::{Cluster, ExtraElement, Grid, Host, Metric, MetricType, Snapshot};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

use super::decode::decode_document;
use crate::error::ParseError;

const ROOT: &str = "GANGLIA_XML";

/// Decode and parse a raw document.
pub fn parse_snapshot(bytes: &[u8]) -> Result<Snapshot, ParseError> {
    let text = decode_document(bytes)?;
    parse_str(&text)
}

/// Parse an already decoded document.
pub fn parse_str(text: &str) -> Result<Snapshot, ParseError> {
    let mut reader = Reader::from_str(text);
    let mut tree = TreeBuilder::default();

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event()
            .map_err(|source| ParseError::Xml { position, source })?;

        match event {
            Event::Start(element) => tree.open(&element, position)?,
            Event::Empty(element) => {
                tree.open(&element, position)?;
                tree.close();
            }
            Event::End(_) => tree.close(),
            Event::Eof => break,
            // Prolog, doctype, comments and character data carry nothing we use
            _ => {}
        }
    }

    tree.finish()
}

/// A partially built node on the parse stack.
#[derive(Debug)]
enum Node {
    Root(Snapshot),
    Grid(Grid),
    Cluster(Cluster),
    Host(Host),
    Metric(Metric),
    ExtraData(Vec<ExtraElement>),
    Extra(ExtraElement),
    /// An element we do not model, skipped with its whole subtree.
    Skipped(String),
}

impl Node {
    fn element_name(&self) -> &str {
        match self {
            Node::Root(_) => ROOT,
            Node::Grid(_) => "GRID",
            Node::Cluster(_) => "CLUSTER",
            Node::Host(_) => "HOST",
            Node::Metric(_) => "METRIC",
            Node::ExtraData(_) => "EXTRA_DATA",
            Node::Extra(_) => "EXTRA_ELEMENT",
            Node::Skipped(name) => name,
        }
    }
}

#[derive(Debug, Default)]
struct TreeBuilder {
    stack: Vec<Node>,
    root: Option<Snapshot>,
}

impl TreeBuilder {
    fn open(&mut self, element: &BytesStart<'_>, position: u64) -> Result<(), ParseError> {
        let qname = element.name();
        let name = qname.as_ref();
        let mut attrs = Attributes::read(element, position)?;

        if self.root.is_some() {
            return Err(ParseError::TrailingContent(lossy(name)));
        }

        let node = match (self.stack.last(), name) {
            (None, b"GANGLIA_XML") => Node::Root(Snapshot {
                version: attrs.take("VERSION"),
                source: attrs.take("SOURCE"),
                ..Default::default()
            }),
            (None, _) => return Err(ParseError::UnexpectedRoot(lossy(name))),
            (Some(Node::Root(_)), b"GRID") => Node::Grid(Grid {
                name: attrs.take("NAME").unwrap_or_default(),
                authority: attrs.take("AUTHORITY"),
                localtime: attrs.take("LOCALTIME"),
                clusters: Vec::new(),
            }),
            (Some(Node::Root(_) | Node::Grid(_)), b"CLUSTER") => Node::Cluster(Cluster {
                name: attrs.take("NAME").unwrap_or_default(),
                owner: attrs.take("OWNER"),
                latlong: attrs.take("LATLONG"),
                url: attrs.take("URL"),
                localtime: attrs.take("LOCALTIME"),
                hosts: Vec::new(),
            }),
            (Some(Node::Cluster(_)), b"HOST") => Node::Host(Host {
                name: attrs.take("NAME").unwrap_or_default(),
                ip: attrs.take("IP"),
                location: attrs.take("LOCATION"),
                reported: attrs.take("REPORTED"),
                tn: attrs.take("TN"),
                tmax: attrs.take("TMAX"),
                dmax: attrs.take("DMAX"),
                gmond_started: attrs.take("GMOND_STARTED"),
                metrics: Vec::new(),
            }),
            (Some(Node::Host(_)), b"METRIC") => Node::Metric(Metric {
                name: attrs.require("METRIC", "NAME")?,
                value: attrs.require("METRIC", "VAL")?,
                kind: attrs.take("TYPE").map(MetricType::from).unwrap_or_default(),
                units: attrs.take("UNITS"),
                tn: attrs.take("TN"),
                tmax: attrs.take("TMAX"),
                dmax: attrs.take("DMAX"),
                slope: attrs.take("SLOPE"),
                source: attrs.take("SOURCE"),
                extra: Vec::new(),
            }),
            (Some(Node::Metric(_)), b"EXTRA_DATA") => Node::ExtraData(Vec::new()),
            (Some(Node::ExtraData(_)), b"EXTRA_ELEMENT") => Node::Extra(ExtraElement {
                name: attrs.take("NAME").unwrap_or_default(),
                value: attrs.take("VAL").unwrap_or_default(),
            }),
            (Some(Node::Skipped(_)), _) => Node::Skipped(lossy(name)),
            (Some(parent), _) => {
                debug!(
                    element = %lossy(name),
                    parent = parent.element_name(),
                    "skipping unrecognized element"
                );
                Node::Skipped(lossy(name))
            }
        };

        self.stack.push(node);
        Ok(())
    }

    /// Attach the innermost open node to its parent.
    ///
    /// quick-xml rejects unbalanced end tags, so there is always a node to
    /// pop, and `open` only pushes a node onto a parent of the right kind.
    fn close(&mut self) {
        let Some(node) = self.stack.pop() else {
            return;
        };

        match (self.stack.last_mut(), node) {
            (None, Node::Root(snapshot)) => self.root = Some(snapshot),
            (Some(Node::Root(snapshot)), Node::Grid(grid)) => snapshot.grids.push(grid),
            (Some(Node::Root(snapshot)), Node::Cluster(cluster)) => {
                snapshot.clusters.push(cluster)
            }
            (Some(Node::Grid(grid)), Node::Cluster(cluster)) => grid.clusters.push(cluster),
            (Some(Node::Cluster(cluster)), Node::Host(host)) => cluster.hosts.push(host),
            (Some(Node::Host(host)), Node::Metric(metric)) => host.metrics.push(metric),
            (Some(Node::Metric(metric)), Node::ExtraData(extra)) => metric.extra.extend(extra),
            (Some(Node::ExtraData(extra)), Node::Extra(element)) => extra.push(element),
            (_, Node::Skipped(_)) => {}
            (parent, node) => warn!(
                element = node.element_name(),
                parent = parent.map(|p| p.element_name()),
                "dropping misplaced element"
            ),
        }
    }

    fn finish(self) -> Result<Snapshot, ParseError> {
        if let Some(open) = self.stack.last() {
            return Err(ParseError::Truncated(open.element_name().to_string()));
        }
        self.root.ok_or(ParseError::Empty)
    }
}

/// Unescaped attributes of one element, consumed as they are mapped.
#[derive(Debug)]
struct Attributes(Vec<(String, String)>);

impl Attributes {
    fn read(element: &BytesStart<'_>, position: u64) -> Result<Self, ParseError> {
        let mut attrs = Vec::new();
        for attr in element.attributes() {
            let attr = attr.map_err(|err| ParseError::Xml {
                position,
                source: err.into(),
            })?;
            let value = attr
                .unescape_value()
                .map_err(|source| ParseError::Xml { position, source })?;
            attrs.push((lossy(attr.key.as_ref()), value.into_owned()));
        }
        Ok(Self(attrs))
    }

    fn take(&mut self, key: &str) -> Option<String> {
        let index = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.swap_remove(index).1)
    }

    fn require(
        &mut self,
        element: &'static str,
        attribute: &'static str,
    ) -> Result<String, ParseError> {
        self.take(attribute)
            .ok_or(ParseError::MissingAttribute { element, attribute })
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
