//! Body conversion: quote stripping followed by Markdown rendering.

pub mod dom;
pub mod markdown;
pub mod quote;
pub mod table;

use tracing::{info, warn};

use crate::model::mail::{Body, BodyKind};

/// Note text used when a message has no usable body or conversion failed.
pub const NO_CONTENT: &str = "No content could be decoded.";

/// Turn the selected body into note Markdown.
///
/// Never fails: an empty body or a conversion error yields [`NO_CONTENT`].
pub fn body_to_markdown(body: &Body) -> String {
    let (content, kind) = match body {
        Body::Html(html) => (html.as_str(), BodyKind::Html),
        Body::Plain(text) => (text.as_str(), BodyKind::Plain),
        Body::Empty => return NO_CONTENT.to_string(),
    };

    let stripped = quote::strip_quotes(content, kind);
    match markdown::to_markdown(&stripped, kind) {
        Ok(converted) => {
            match kind {
                BodyKind::Html => info!("Converted HTML to Markdown"),
                BodyKind::Plain => info!("Converted plain text to Markdown"),
            }
            converted
        }
        Err(e) => {
            warn!(error = %e, "Body conversion failed, using placeholder text");
            NO_CONTENT.to_string()
        }
    }
}
