//! URL encoding for index names used as path segments.
//!
//! Elasticsearch rejects most unsafe characters in index names, but names
//! still flow in from configuration and from the cluster itself, so every
//! name is percent-encoded before it is placed in a path. Without it a `/`
//! would address a different API, `?` or `#` would truncate the path, and a
//! `,` or `*` would turn a single-index call into a multi-index one.
//!
//! # Example
//!
//! ```
//! use esmaint_client::endpoints::url_encoding::encode_path_segment;
//!
//! assert_eq!(encode_path_segment("logs/_all"), "logs%2F_all");
//! ```

use percent_encoding::{AsciiSet, CONTROLS, percent_encode};

/// Characters that must be percent-encoded in an index path segment.
pub const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'%') // prevents double-decoding
    .add(b'/') // prevents addressing another API
    .add(b'?')
    .add(b'#')
    .add(b'+')
    .add(b',') // multi-index separator
    .add(b'*') // wildcard expansion
    .add(b';')
    .add(b'[')
    .add(b']');

/// Percent-encode an index name for safe use as a URL path segment.
pub fn encode_path_segment(segment: &str) -> String {
    percent_encode(segment.as_bytes(), PATH_SEGMENT_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typical_index_names_unchanged() {
        assert_eq!(encode_path_segment("info-2020-05-05"), "info-2020-05-05");
        assert_eq!(encode_path_segment("app_logs.v2"), "app_logs.v2");
        assert_eq!(encode_path_segment(".kibana"), ".kibana");
    }

    #[test]
    fn test_encode_slash() {
        assert_eq!(encode_path_segment("a/b"), "a%2Fb");
        assert_eq!(encode_path_segment("../_cluster"), "..%2F_cluster");
    }

    #[test]
    fn test_encode_multi_index_syntax() {
        assert_eq!(encode_path_segment("a,b"), "a%2Cb");
        assert_eq!(encode_path_segment("info-*"), "info-%2A");
    }

    #[test]
    fn test_encode_query_and_fragment() {
        assert_eq!(encode_path_segment("a?pretty"), "a%3Fpretty");
        assert_eq!(encode_path_segment("a#b"), "a%23b");
    }

    #[test]
    fn test_encode_percent() {
        assert_eq!(encode_path_segment("100%"), "100%25");
        assert_eq!(encode_path_segment("a%2Fb"), "a%252Fb");
    }

    #[test]
    fn test_encode_unicode() {
        assert_eq!(encode_path_segment("journal-\u{00e9}t\u{00e9}"), "journal-%C3%A9t%C3%A9");
    }

    #[test]
    fn test_date_math_colon_kept() {
        assert_eq!(encode_path_segment("a:b"), "a:b");
    }
}
