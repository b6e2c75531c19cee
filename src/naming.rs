//! Graphite key naming.
//!
//! Graphite splits metric keys on `.` to build its hierarchy, so a `.`
//! inside a single segment (a fully qualified host name, say) would add
//! levels. Segments are made safe by replacing it with `_`.

use std::borrow::Cow;

/// Hierarchy separator in Graphite keys.
pub const PATH_SEPARATOR: char = '.';

/// What [`PATH_SEPARATOR`] is replaced with inside a segment.
pub const SEGMENT_REPLACEMENT: char = '_';

/// Make a raw name usable as one Graphite key segment.
///
/// Every `.` becomes `_`; all other characters, non-ASCII included, pass
/// through untouched. Borrows when there is nothing to replace.
///
/// ```rust
/// use ggg::naming::sanitize_segment;
///
/// assert_eq!(sanitize_segment("web.example.com"), "web_example_com");
/// assert_eq!(sanitize_segment("db1"), "db1");
/// ```
pub fn sanitize_segment(raw: &str) -> Cow<'_, str> {
    if raw.contains(PATH_SEPARATOR) {
        Cow::Owned(
            raw.chars()
                .map(|c| {
                    if c == PATH_SEPARATOR {
                        SEGMENT_REPLACEMENT
                    } else {
                        c
                    }
                })
                .collect(),
        )
    } else {
        Cow::Borrowed(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_every_separator() {
        assert_eq!(sanitize_segment("web.01"), "web_01");
        assert_eq!(sanitize_segment("a.b.c.d"), "a_b_c_d");
        assert_eq!(sanitize_segment("..."), "___");
        assert_eq!(sanitize_segment(".leading"), "_leading");
    }

    #[test]
    fn test_borrows_when_clean() {
        assert!(matches!(sanitize_segment("db1"), Cow::Borrowed("db1")));
        assert!(matches!(sanitize_segment(""), Cow::Borrowed("")));
    }

    #[test]
    fn test_is_idempotent() {
        for raw in ["web.01", "plain", "", "x.y_z.", "h\u{f6}st.d\u{e9}"] {
            let once = sanitize_segment(raw).into_owned();
            let twice = sanitize_segment(&once).into_owned();
            assert_eq!(once, twice);
            assert!(!once.contains('.'));
        }
    }

    #[test]
    fn test_preserves_other_bytes() {
        let raw = "h\u{f6}st-\u{65e5}\u{672c}.example_1 x";
        let out = sanitize_segment(raw);
        assert_eq!(out.len(), raw.len());

        for (a, b) in raw.bytes().zip(out.bytes()) {
            if a == b'.' {
                assert_eq!(b, b'_');
            } else {
                assert_eq!(a, b);
            }
        }
    }
}
