//! Decoded message and body types.

use super::attachment::AttachmentPart;

/// Subject used when a message carries no `Subject:` header.
pub const UNTITLED: &str = "Untitled";

/// Which representation a body candidate carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// `text/plain`
    Plain,
    /// `text/html`
    Html,
}

/// One leaf of a message's MIME tree, as seen by the classifier.
#[derive(Debug, Clone)]
pub struct MimePart {
    /// Lower-cased `type/subtype` (e.g. `"text/plain"`, `"image/png"`).
    pub content_type: String,

    /// `Content-Disposition` type (`"inline"`, `"attachment"`), if present.
    pub disposition: Option<String>,

    /// Filename from `Content-Disposition` or the `Content-Type` name parameter.
    pub filename: Option<String>,

    /// `Content-ID` without angle brackets, if present.
    pub content_id: Option<String>,

    /// Decoded payload (transfer encoding removed, text already in UTF-8).
    pub payload: Vec<u8>,
}

/// What a [`MimePart`] contributes to the note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartRole {
    Body(BodyKind),
    Attachment,
    Ignored,
}

impl MimePart {
    /// Classify the part.
    ///
    /// A non-empty filename always makes an attachment. Otherwise only
    /// `text/plain` and `text/html` parts not marked as attachments are body
    /// candidates; everything else is ignored.
    pub fn role(&self) -> PartRole {
        if self.filename.as_deref().is_some_and(|f| !f.is_empty()) {
            return PartRole::Attachment;
        }
        let is_attachment_disposition = self
            .disposition
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case("attachment"));
        if is_attachment_disposition {
            return PartRole::Ignored;
        }
        match self.content_type.as_str() {
            "text/plain" => PartRole::Body(BodyKind::Plain),
            "text/html" => PartRole::Body(BodyKind::Html),
            _ => PartRole::Ignored,
        }
    }
}

/// A body candidate's decoded text.
#[derive(Debug, Clone)]
pub struct BodyCandidate {
    pub kind: BodyKind,
    pub text: String,
}

/// The single body value fed to the converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Html(String),
    Plain(String),
    /// No usable body candidate.
    Empty,
}

/// Everything the pipeline needs from one raw message.
#[derive(Debug, Clone)]
pub struct DecodedMail {
    /// Decoded subject, or [`UNTITLED`] when the header is absent.
    pub subject: String,

    /// Body candidates in MIME order.
    pub bodies: Vec<BodyCandidate>,

    /// Attachment parts in MIME order.
    pub attachments: Vec<AttachmentPart>,
}

impl DecodedMail {
    /// Select the body: HTML wins over plain text, and within a kind the
    /// last non-empty candidate in MIME order wins. The other kind is dropped.
    pub fn body(&self) -> Body {
        let last_of = |kind: BodyKind| {
            self.bodies
                .iter()
                .rev()
                .find(|c| c.kind == kind && !c.text.is_empty())
                .map(|c| c.text.clone())
        };
        if let Some(html) = last_of(BodyKind::Html) {
            Body::Html(html)
        } else if let Some(text) = last_of(BodyKind::Plain) {
            Body::Plain(text)
        } else {
            Body::Empty
        }
    }
}
