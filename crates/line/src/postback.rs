//! Postback `data` parsing
//!
//! Postback buttons carry an opaque `key=value&key=value` string. One parser
//! serves every postback command; no URL decoding is applied.

use std::collections::HashMap;

/// Split `data` into a key/value map.
///
/// Pairs are separated by `&`; within a pair, only the first two
/// `=`-separated segments count (a second `=` and anything after it is
/// dropped). Pairs with an empty key or no `=` at all are skipped.
pub fn parse_data(data: &str) -> HashMap<String, String> {
    data.split('&')
        .filter_map(|pair| {
            let mut parts = pair.split('=');
            let key = parts.next()?;
            let value = parts.next()?;
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_key_value_pairs() {
        let parsed = parse_data("type=delete&groupId=g1");
        assert_eq!(parsed.get("type").map(String::as_str), Some("delete"));
        assert_eq!(parsed.get("groupId").map(String::as_str), Some("g1"));
    }

    #[test]
    fn test_single_pair() {
        let parsed = parse_data("type=list");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.get("type").map(String::as_str), Some("list"));
    }

    #[test]
    fn test_pair_without_equals_is_skipped() {
        let parsed = parse_data("type=list&orphan");
        assert_eq!(parsed.len(), 1);
        assert!(!parsed.contains_key("orphan"));
    }

    #[test]
    fn test_empty_key_is_skipped() {
        let parsed = parse_data("=value&type=list");
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_empty_value_is_kept() {
        let parsed = parse_data("groupId=");
        assert_eq!(parsed.get("groupId").map(String::as_str), Some(""));
    }

    #[test]
    fn test_second_equals_is_dropped() {
        let parsed = parse_data("data=a=b");
        assert_eq!(parsed.get("data").map(String::as_str), Some("a"));
    }

    #[test]
    fn test_no_url_decoding() {
        let parsed = parse_data("label=a%20b");
        assert_eq!(parsed.get("label").map(String::as_str), Some("a%20b"));
    }
}
