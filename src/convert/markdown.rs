//! Markdown conversion of message bodies.
//!
//! Plain text is flattened to one whitespace-normalized paragraph. HTML goes
//! through three steps:
//!
//! 1. pre-clean on the DOM: depth check, `<center>` unwrapped, every
//!    outermost table with rows rendered by [`table_to_markdown`] and left
//!    behind as a placeholder token
//! 2. `htmd` converts the rest
//! 3. post-clean: placeholders swapped for the tables, line ends trimmed,
//!    blank-line runs collapsed, the link artifact repaired

use htmd::options::{BulletListMarker, CodeBlockStyle, HeadingStyle, Options};
use htmd::HtmlToMarkdown;
use kuchiki::NodeRef;

use crate::error::{MailNoteError, Result};
use crate::model::mail::BodyKind;

use super::dom::{elements, has_ancestor, max_depth, parse, unwrap_node};
use super::table::table_to_markdown;

/// Deepest element nesting the converter accepts, counting the implied
/// `html` and `body` elements.
pub const MAX_DEPTH: usize = 256;

/// Stray escaped-underscore link prefix some mail clients leave behind.
const LINK_ARTIFACT: &str = "_\u{200b}_[ _ ";

/// Elements whose content never reaches the note.
const SKIPPED_ELEMENTS: &[&str] = &["head", "noscript", "script", "style", "template", "title"];

/// Convert a body of the given kind to Markdown.
pub fn to_markdown(body: &str, kind: BodyKind) -> Result<String> {
    match kind {
        BodyKind::Plain => Ok(collapse_whitespace(body)),
        BodyKind::Html => html_to_markdown(body),
    }
}

/// Collapse every whitespace run (newlines included) to one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render HTML as Markdown.
///
/// Fails when the element nesting exceeds [`MAX_DEPTH`] or the converter
/// gives up on the markup.
pub fn html_to_markdown(html: &str) -> Result<String> {
    let document = parse(html);
    let depth = max_depth(&document);
    if depth > MAX_DEPTH {
        return Err(MailNoteError::Conversion(format!(
            "element nesting of {depth} exceeds the limit of {MAX_DEPTH}"
        )));
    }

    for center in elements(&document, "center") {
        unwrap_node(&center);
    }
    let tables = extract_tables(&document);

    let markdown = converter()
        .convert(&document.to_string())
        .map_err(|e| MailNoteError::Conversion(e.to_string()))?;
    Ok(post_clean(&restore_tables(markdown, &tables)))
}

fn converter() -> HtmlToMarkdown {
    HtmlToMarkdown::builder()
        .skip_tags(SKIPPED_ELEMENTS.to_vec())
        .options(Options {
            heading_style: HeadingStyle::Atx,
            bullet_list_marker: BulletListMarker::Asterisk,
            code_block_style: CodeBlockStyle::Fenced,
            ..Options::default()
        })
        .build()
}

/// A rendered table and the token standing in for it during conversion.
struct TableSlot {
    token: String,
    markdown: String,
}

/// Render every outermost table that has rows and leave a token in its
/// place. Tokens are plain letters and digits so the converter passes them
/// through untouched; the trailing `X` keeps `T1X` from matching `T10X`.
fn extract_tables(document: &NodeRef) -> Vec<TableSlot> {
    let mut slots = Vec::new();
    for table in elements(document, "table") {
        if has_ancestor(&table, "table") {
            continue;
        }
        let Some(markdown) = table_to_markdown(&table) else {
            continue;
        };
        let token = format!("MAILNOTETABLE{}X", slots.len());
        table.insert_before(NodeRef::new_text(token.clone()));
        table.detach();
        slots.push(TableSlot { token, markdown });
    }
    slots
}

fn restore_tables(mut markdown: String, tables: &[TableSlot]) -> String {
    for slot in tables {
        let block = format!("\n\n{}\n\n", slot.markdown.trim_end());
        markdown = markdown.replace(&slot.token, &block);
    }
    markdown
}

fn post_clean(markdown: &str) -> String {
    tidy(markdown).replace(LINK_ARTIFACT, "[")
}

/// Trim line ends, keep at most one blank line in a row, and trim the edges.
fn tidy(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim_matches('\n').to_string()
}
