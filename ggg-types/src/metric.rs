//! Metric nodes - the leaves of a snapshot.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::TEXTUAL_TYPE_TAG;

/// Declared type of a metric value.
///
/// Ganglia carries every value as text and tags it with one of these.
/// Unrecognized tags are preserved verbatim in [`MetricType::Other`] and,
/// like every tag other than `string`, count as numeric.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum MetricType {
    String,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float,
    Double,
    Timestamp,
    /// Any other tag, including the empty tag of a metric without `TYPE`.
    Other(String),
}

impl MetricType {
    /// Map a raw type tag onto a metric type.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            TEXTUAL_TYPE_TAG => MetricType::String,
            "int8" => MetricType::Int8,
            "uint8" => MetricType::Uint8,
            "int16" => MetricType::Int16,
            "uint16" => MetricType::Uint16,
            "int32" => MetricType::Int32,
            "uint32" => MetricType::Uint32,
            "float" => MetricType::Float,
            "double" => MetricType::Double,
            "timestamp" => MetricType::Timestamp,
            other => MetricType::Other(other.into()),
        }
    }

    /// The raw tag as it appears on the wire.
    pub fn as_tag(&self) -> &str {
        match self {
            MetricType::String => TEXTUAL_TYPE_TAG,
            MetricType::Int8 => "int8",
            MetricType::Uint8 => "uint8",
            MetricType::Int16 => "int16",
            MetricType::Uint16 => "uint16",
            MetricType::Int32 => "int32",
            MetricType::Uint32 => "uint32",
            MetricType::Float => "float",
            MetricType::Double => "double",
            MetricType::Timestamp => "timestamp",
            MetricType::Other(tag) => tag,
        }
    }

    /// Whether values of this type are textual.
    pub fn is_textual(&self) -> bool {
        matches!(self, MetricType::String)
    }
}

impl Default for MetricType {
    fn default() -> Self {
        MetricType::Other(String::new())
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl From<String> for MetricType {
    fn from(tag: String) -> Self {
        match MetricType::from_tag(&tag) {
            MetricType::Other(_) => MetricType::Other(tag),
            known => known,
        }
    }
}

impl From<&str> for MetricType {
    fn from(tag: &str) -> Self {
        MetricType::from_tag(tag)
    }
}

impl From<MetricType> for String {
    fn from(kind: MetricType) -> Self {
        match kind {
            MetricType::Other(tag) => tag,
            known => known.as_tag().into(),
        }
    }
}

/// One named measurement on a host at snapshot time.
///
/// The value stays exactly as it was reported. It is never parsed into a
/// number, so the sink sees the source's own formatting.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metric {
    pub name: String,
    pub value: String,
    pub kind: MetricType,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub units: Option<String>,

    /// Seconds since the value was last reported.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub tn: Option<String>,

    /// Expected maximum reporting interval, in seconds.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub tmax: Option<String>,

    /// Lifetime after which the metric is dropped, in seconds (0 = forever).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub dmax: Option<String>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub slope: Option<String>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub source: Option<String>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty", default))]
    pub extra: Vec<ExtraElement>,
}

impl Metric {
    /// Create a metric with only the forwarded attributes set.
    pub fn new(name: impl Into<String>, value: impl Into<String>, kind: MetricType) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind,
            ..Default::default()
        }
    }

    /// Whether this metric is forwarded to a numeric sink.
    pub fn is_numeric(&self) -> bool {
        !self.kind.is_textual()
    }

    /// Look up an extra attribute by name (e.g. `GROUP`, `DESC`, `TITLE`).
    pub fn extra(&self, name: &str) -> Option<&str> {
        self.extra
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value.as_str())
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn with_slope(mut self, slope: impl Into<String>) -> Self {
        self.slope = Some(slope.into());
        self
    }

    pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push(ExtraElement::new(name, value));
        self
    }
}

/// An ancillary key/value pair attached to a metric. Never forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtraElement {
    pub name: String,
    pub value: String,
}

impl ExtraElement {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
