//! Attachment parts and the resource links rendered for them.

/// A MIME part that carries a filename and is uploaded as a resource.
#[derive(Debug, Clone)]
pub struct AttachmentPart {
    /// Filename as given by the sender (RFC 2231 / encoded-words resolved).
    pub filename: String,

    /// Lower-cased MIME content type (e.g. `"image/jpeg"`, `"application/pdf"`).
    pub content_type: String,

    /// Content-ID, used to re-point `cid:` references in the HTML body.
    pub content_id: Option<String>,

    /// Decoded binary content.
    pub payload: Vec<u8>,
}

impl AttachmentPart {
    /// `true` for any `image/*` part; such parts are embedded rather than linked.
    pub fn is_image(&self) -> bool {
        self.content_type
            .split('/')
            .next()
            .is_some_and(|main| main.eq_ignore_ascii_case("image"))
    }
}

/// Markdown reference to an uploaded resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLink {
    pub filename: String,
    pub resource_id: String,
    pub is_image: bool,
}

impl ResourceLink {
    /// Resource URL in the note store's internal link syntax.
    pub fn target(&self) -> String {
        format!(":/{}", self.resource_id)
    }

    /// `![name](:/id)` for images, `[name](:/id)` for everything else.
    pub fn to_markdown(&self) -> String {
        let bang = if self.is_image { "!" } else { "" };
        format!("{bang}[{}]({})", self.filename, self.target())
    }
}
