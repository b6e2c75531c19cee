//! Run-scoped settings shared by every forwarding task.

use std::time::{SystemTime, UNIX_EPOCH};

/// Immutable settings for one run.
///
/// The timestamp is captured once, before traversal starts, and stamped on
/// every line: it is the snapshot time, not the time each line was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    prefix: String,
    timestamp: u64,
}

impl RunContext {
    /// Capture the current time as the snapshot time.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_timestamp(prefix, current_timestamp_secs())
    }

    /// Use a fixed snapshot time (whole seconds since the Unix epoch).
    pub fn with_timestamp(prefix: impl Into<String>, timestamp: u64) -> Self {
        Self {
            prefix: prefix.into(),
            timestamp,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Render one plaintext-protocol line.
    ///
    /// `host` must already be a safe key segment; `metric` and `value` are
    /// written verbatim.
    ///
    /// ```rust
    /// use ggg::RunContext;
    ///
    /// let ctx = RunContext::with_timestamp("ggg.", 1700000000);
    /// assert_eq!(
    ///     ctx.format_line("web_01", "load_one", "0.5"),
    ///     "ggg.web_01.load_one 0.5 1700000000\n"
    /// );
    /// ```
    pub fn format_line(&self, host: &str, metric: &str, value: &str) -> String {
        format!(
            "{}{}.{} {} {}\n",
            self.prefix, host, metric, value, self.timestamp
        )
    }
}

fn current_timestamp_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        let ctx = RunContext::with_timestamp("ggg.", 42);
        assert_eq!(ctx.format_line("h", "m", "1"), "ggg.h.m 1 42\n");
    }

    #[test]
    fn test_empty_prefix_and_host() {
        let ctx = RunContext::with_timestamp("", 42);
        assert_eq!(ctx.format_line("", "m", "1"), ".m 1 42\n");
    }

    #[test]
    fn test_value_is_verbatim() {
        let ctx = RunContext::with_timestamp("p.", 1);
        assert_eq!(ctx.format_line("h", "m", "1.000e+03"), "p.h.m 1.000e+03 1\n");
        assert_eq!(ctx.format_line("h", "m", "0.10"), "p.h.m 0.10 1\n");
    }

    #[test]
    fn test_new_captures_current_time() {
        let before = current_timestamp_secs();
        let ctx = RunContext::new("ggg.");
        let after = current_timestamp_secs();
        assert!(ctx.timestamp() >= before && ctx.timestamp() <= after);
        assert_eq!(ctx.prefix(), "ggg.");
    }
}
