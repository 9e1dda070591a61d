//! Markup protection for machine translation
//!
//! Translation providers treat inline markup and interpolation expressions as
//! prose: they translate link text inside attributes, split tags, or localize
//! the variable name inside `${...}`. Before a string goes out, every
//! protected fragment is swapped for an opaque anchor `{{<token>}}`; after the
//! translation comes back the anchors are swapped back.
//!
//! # Example
//!
//! ```ignore
//! let encoded = encode("Hello <b>World</b>, cost is ${price}");
//! // encoded.text == "Hello {{3f2a...}}, cost is {{9c41...}}"
//! let restored = decode(&encoded.text, &encoded.placeholders);
//! assert_eq!(restored, "Hello <b>World</b>, cost is ${price}");
//! ```
//!
//! Fragments are extracted in four passes, in this order: bold, italic,
//! hyperlink, interpolation. A fragment swapped out by an earlier pass no
//! longer matches later passes, but a later fragment may enclose an earlier
//! anchor (`<i>see <b>this</b></i>`), so restoration runs in reverse.

use crate::error::{MtError, MtResult};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use uuid::Uuid;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<b>.*?</b>").expect("bold pattern"));

static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<i>.*?</i>").expect("italic pattern"));

static HYPERLINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a\s+href=(?:"[^"]*"|'[^']*')[^>]*>.*?</a>"#).expect("hyperlink pattern")
});

// Braces are excluded from the body so an anchor left by an earlier pass
// (`${{<token>}}`) is never swallowed into an interpolation.
static INTERPOLATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{[^{}]*\}").expect("interpolation pattern"));

/// A protected fragment and the token standing in for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Unique token (simple-form UUID), without delimiters
    pub token: String,
    /// The exact markup captured from the source text
    pub fragment: String,
}

impl Placeholder {
    fn new(fragment: &str) -> Self {
        Placeholder {
            token: Uuid::new_v4().simple().to_string(),
            fragment: fragment.to_string(),
        }
    }

    /// The token as it appears in encoded text: `{{token}}`
    pub fn anchor(&self) -> String {
        format!("{{{{{}}}}}", self.token)
    }
}

/// Placeholders produced by one `encode` call, in extraction order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMap(Vec<Placeholder>);

impl PlaceholderMap {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Placeholder> {
        self.0.iter()
    }

    /// Look up the fragment recorded for a token
    pub fn get(&self, token: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|p| p.token == token)
            .map(|p| p.fragment.as_str())
    }
}

/// Text ready to send to a provider, plus what is needed to restore it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub text: String,
    pub placeholders: PlaceholderMap,
}

/// Replace markup and interpolations with anchor tokens
pub fn encode(text: &str) -> Encoded {
    let mut placeholders = Vec::new();
    let mut current = text.to_string();

    for pattern in [&*BOLD, &*ITALIC, &*HYPERLINK, &*INTERPOLATION] {
        if !pattern.is_match(&current) {
            continue;
        }
        current = pattern
            .replace_all(&current, |caps: &Captures| {
                let placeholder = Placeholder::new(&caps[0]);
                let anchor = placeholder.anchor();
                placeholders.push(placeholder);
                anchor
            })
            .into_owned();
    }

    Encoded {
        text: current,
        placeholders: PlaceholderMap(placeholders),
    }
}

/// Restore anchors to their fragments
///
/// Each anchor's first occurrence is replaced. An anchor the provider dropped
/// is simply not restored; an anchor it duplicated is restored once and the
/// copy stays as token text.
pub fn decode(text: &str, placeholders: &PlaceholderMap) -> String {
    let mut result = text.to_string();
    for placeholder in placeholders.iter().rev() {
        result = result.replacen(&placeholder.anchor(), &placeholder.fragment, 1);
    }
    result
}

/// Restore anchors, failing if any anchor is missing or repeated
pub fn decode_strict(text: &str, placeholders: &PlaceholderMap) -> MtResult<String> {
    let mut result = text.to_string();
    for placeholder in placeholders.iter().rev() {
        let anchor = placeholder.anchor();
        match result.matches(&anchor).count() {
            1 => result = result.replacen(&anchor, &placeholder.fragment, 1),
            0 => {
                return Err(MtError::PlaceholderError(format!(
                    "Missing anchor for fragment '{}'",
                    placeholder.fragment
                )));
            }
            n => {
                return Err(MtError::PlaceholderError(format!(
                    "Anchor for fragment '{}' appears {} times",
                    placeholder.fragment, n
                )));
            }
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments(encoded: &Encoded) -> Vec<&str> {
        encoded
            .placeholders
            .iter()
            .map(|p| p.fragment.as_str())
            .collect()
    }

    // ========== Encode Tests ==========

    #[test]
    fn test_plain_text_unchanged() {
        let encoded = encode("Nothing to protect here.");
        assert_eq!(encoded.text, "Nothing to protect here.");
        assert!(encoded.placeholders.is_empty());
    }

    #[test]
    fn test_empty_text() {
        let encoded = encode("");
        assert_eq!(encoded.text, "");
        assert!(encoded.placeholders.is_empty());
    }

    #[test]
    fn test_bold_is_non_greedy() {
        let encoded = encode("<b>a</b>x<b>c</b>");
        assert_eq!(fragments(&encoded), vec!["<b>a</b>", "<b>c</b>"]);
        assert!(encoded.text.contains('x'));
        assert!(!encoded.text.contains("<b>"));
    }

    #[test]
    fn test_all_classes_in_priority_order() {
        let encoded =
            encode(r#"${name}: <a href="/docs">docs</a>, <i>soon</i> and <b>now</b>"#);
        assert_eq!(
            fragments(&encoded),
            vec![
                "<b>now</b>",
                "<i>soon</i>",
                r#"<a href="/docs">docs</a>"#,
                "${name}"
            ]
        );
        for placeholder in encoded.placeholders.iter() {
            assert_eq!(encoded.text.matches(&placeholder.anchor()).count(), 1);
        }
    }

    #[test]
    fn test_anchor_format() {
        let encoded = encode("Pay ${amount}");
        let placeholder = encoded.placeholders.iter().next().unwrap();
        assert_eq!(placeholder.token.len(), 32);
        assert!(placeholder.token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(encoded.text, format!("Pay {{{{{}}}}}", placeholder.token));
    }

    #[test]
    fn test_tokens_are_unique() {
        let encoded = encode("${a} ${a} ${a} ${a}");
        let tokens: std::collections::HashSet<_> =
            encoded.placeholders.iter().map(|p| &p.token).collect();
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_link_href_captured_whole() {
        let encoded = encode(r#"Read <a href="https://example.org/?q=a b">the guide</a>."#);
        assert_eq!(
            fragments(&encoded),
            vec![r#"<a href="https://example.org/?q=a b">the guide</a>"#]
        );
        assert!(!encoded.text.contains("example.org"));
    }

    #[test]
    fn test_bold_spanning_lines() {
        let encoded = encode("<b>two\nlines</b> end");
        assert_eq!(fragments(&encoded), vec!["<b>two\nlines</b>"]);
    }

    #[test]
    fn test_unclosed_tag_left_alone() {
        let encoded = encode("<b>never closed");
        assert_eq!(encoded.text, "<b>never closed");
        assert!(encoded.placeholders.is_empty());
    }

    #[test]
    fn test_interpolation_does_not_swallow_anchor() {
        let encoded = encode("$<b>5</b> off, ${code} today");
        assert_eq!(fragments(&encoded), vec!["<b>5</b>", "${code}"]);
        let bold = encoded.placeholders.iter().next().unwrap().anchor();
        assert!(encoded.text.starts_with(&format!("${}", bold)));
        assert!(!encoded.text.contains("}}}"));
        assert_eq!(
            decode(&encoded.text, &encoded.placeholders),
            "$<b>5</b> off, ${code} today"
        );
    }

    #[test]
    fn test_get_by_token() {
        let encoded = encode("Hi ${user}");
        let token = encoded.placeholders.iter().next().unwrap().token.clone();
        assert_eq!(encoded.placeholders.get(&token), Some("${user}"));
        assert_eq!(encoded.placeholders.get("nope"), None);
    }

    // ========== Decode Tests ==========

    #[test]
    fn test_identity_round_trip() {
        let samples = [
            "Hello <b>World</b>, cost is ${price}",
            r#"<a href="/a">A</a> and <a href="/b">B</a>"#,
            "<i>see <b>this</b></i> now",
            "no markup",
            "${a}${b}<b></b>",
        ];
        for sample in samples {
            let encoded = encode(sample);
            assert_eq!(decode(&encoded.text, &encoded.placeholders), sample);
            assert_eq!(
                decode_strict(&encoded.text, &encoded.placeholders).unwrap(),
                sample
            );
        }
    }

    #[test]
    fn test_nested_fragments_restore() {
        let encoded = encode("<i>see <b>this</b></i>");
        assert_eq!(encoded.placeholders.len(), 2);
        // Only the outer italic anchor survives in the encoded text
        assert_eq!(encoded.text.matches("{{").count(), 1);
        assert_eq!(
            decode(&encoded.text, &encoded.placeholders),
            "<i>see <b>this</b></i>"
        );
    }

    #[test]
    fn test_placeholders_iterate_both_ways() {
        let encoded = encode("<b>A</b> <i>B</i> ${c}");
        let backward: Vec<&str> = encoded
            .placeholders
            .iter()
            .rev()
            .map(|p| p.fragment.as_str())
            .collect();
        assert_eq!(fragments(&encoded), vec!["<b>A</b>", "<i>B</i>", "${c}"]);
        assert_eq!(backward, vec!["${c}", "<i>B</i>", "<b>A</b>"]);
    }

    #[test]
    fn test_decode_after_reordering() {
        let encoded = encode("<b>A</b> then ${b}");
        let anchors: Vec<String> = encoded.placeholders.iter().map(|p| p.anchor()).collect();
        let translated = format!("{} luego {}", anchors[1], anchors[0]);
        assert_eq!(
            decode(&translated, &encoded.placeholders),
            "${b} luego <b>A</b>"
        );
    }

    #[test]
    fn test_decode_missing_token_is_lenient() {
        let encoded = encode("Hello <b>World</b>");
        assert_eq!(decode("Hola", &encoded.placeholders), "Hola");
    }

    #[test]
    fn test_decode_duplicate_restores_first_only() {
        let encoded = encode("${x}");
        let anchor = encoded.placeholders.iter().next().unwrap().anchor();
        let translated = format!("{} {}", anchor, anchor);
        assert_eq!(
            decode(&translated, &encoded.placeholders),
            format!("${{x}} {}", anchor)
        );
    }

    #[test]
    fn test_decode_strict_missing_token() {
        let encoded = encode("Hello <b>World</b>");
        match decode_strict("Hola", &encoded.placeholders) {
            Err(MtError::PlaceholderError(msg)) => assert!(msg.contains("<b>World</b>")),
            other => panic!("Expected PlaceholderError, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_strict_duplicate_token() {
        let encoded = encode("${x}");
        let anchor = encoded.placeholders.iter().next().unwrap().anchor();
        let translated = format!("{}{}", anchor, anchor);
        match decode_strict(&translated, &encoded.placeholders) {
            Err(MtError::PlaceholderError(msg)) => assert!(msg.contains("2 times")),
            other => panic!("Expected PlaceholderError, got {:?}", other),
        }
    }
}
