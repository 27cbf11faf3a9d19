//! Quote stripping: removes reply markers and forwarding wrappers.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::mail::BodyKind;

use super::dom::{body_html, elements, parse, stripped_text, unwrap_node};

/// Text that marks a forwarded-message wrapper in HTML bodies.
const FORWARD_MARKER: &str = "Forwarded";

/// One or more runs of `>`/`|` at the start of a line, each optionally
/// followed by one space or tab. Repeating the group makes stripping
/// idempotent (`> > x` loses both markers in one pass).
static QUOTE_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:[>|]+[ \t]?)+").expect("valid quote-marker pattern"));

/// Strip quoting from a body according to its kind.
pub fn strip_quotes(content: &str, kind: BodyKind) -> String {
    match kind {
        BodyKind::Plain => strip_plain(content),
        BodyKind::Html => strip_html(content),
    }
}

/// Remove leading quote markers from every line.
pub fn strip_plain(content: &str) -> String {
    QUOTE_MARKERS.replace_all(content, "").into_owned()
}

/// Unwrap blockquotes that carry a forwarded message.
///
/// First every `blockquote` whose text mentions "Forwarded" is unwrapped.
/// Then, if any `div` mentions "Forwarded", every blockquote found in the
/// first scan that is still in the tree is unwrapped as well. Blockquotes
/// are not re-scanned, so a forwarding `div` without blockquotes around it
/// changes nothing.
pub fn strip_html(content: &str) -> String {
    let document = parse(content);

    let blockquotes = elements(&document, "blockquote");
    for bq in &blockquotes {
        if bq.parent().is_some() && stripped_text(bq).contains(FORWARD_MARKER) {
            unwrap_node(bq);
        }
    }

    for div in elements(&document, "div") {
        if stripped_text(&div).contains(FORWARD_MARKER) {
            // Unwrapping skips blockquotes that already left the tree
            blockquotes.iter().for_each(unwrap_node);
        }
    }

    body_html(&document)
}
