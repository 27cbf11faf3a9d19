//! MIME message decoding: subject, part classification, payload extraction.

use mail_parser::{HeaderName, Message, MessageParser, MessagePart, MimeHeaders};
use tracing::{debug, warn};

use crate::model::attachment::AttachmentPart;
use crate::model::mail::{BodyCandidate, DecodedMail, MimePart, PartRole, UNTITLED};

/// Decode a raw RFC 5322 message into subject, body candidates and attachments.
///
/// Never fails: an unparseable message yields the placeholder subject and no
/// parts, and undecodable text is replaced lossily.
pub fn decode_message(raw_message: &[u8]) -> DecodedMail {
    let message_bytes = skip_from_line(raw_message);
    let Some(message) = MessageParser::default().parse(message_bytes) else {
        warn!("Failed to parse message, no MIME parts extracted");
        return DecodedMail {
            subject: UNTITLED.to_string(),
            bodies: Vec::new(),
            attachments: Vec::new(),
        };
    };

    let subject = message_subject(&message);
    let mut bodies = Vec::new();
    let mut attachments = Vec::new();

    // Every part once, in document order. Containers are ignored by the
    // classifier; an embedded message/rfc822 is not descended into.
    for part in message.parts.iter().map(to_mime_part) {
        match part.role() {
            PartRole::Body(kind) => bodies.push(BodyCandidate {
                kind,
                text: String::from_utf8_lossy(&part.payload).into_owned(),
            }),
            PartRole::Attachment => attachments.push(AttachmentPart {
                filename: part.filename.unwrap_or_default(),
                content_type: part.content_type,
                content_id: part.content_id,
                payload: part.payload,
            }),
            PartRole::Ignored => {
                debug!(content_type = %part.content_type, "Skipping MIME part");
            }
        }
    }

    DecodedMail {
        subject,
        bodies,
        attachments,
    }
}

/// Decoded `Subject`. An absent header gives [`UNTITLED`]; a present but
/// empty one stays empty.
fn message_subject(message: &Message<'_>) -> String {
    if message.header(HeaderName::Subject).is_none() {
        return UNTITLED.to_string();
    }
    message.subject().unwrap_or_default().to_string()
}

fn to_mime_part(part: &MessagePart<'_>) -> MimePart {
    let content_type = part
        .content_type()
        .map(|ct: &mail_parser::ContentType| {
            let main = ct.ctype();
            match ct.subtype() {
                Some(sub) => format!("{main}/{sub}"),
                None => main.to_string(),
            }
        })
        .unwrap_or_else(|| "text/plain".to_string())
        .to_ascii_lowercase();

    let disposition = part
        .content_disposition()
        .map(|d: &mail_parser::ContentType| d.ctype().to_ascii_lowercase());

    let content_id = part
        .content_id()
        .map(|id| id.trim().trim_matches(|c| c == '<' || c == '>').to_string())
        .filter(|id| !id.is_empty());

    MimePart {
        content_type,
        disposition,
        filename: part.attachment_name().map(String::from),
        content_id,
        payload: part.contents().to_vec(),
    }
}

/// Skip a byte-order mark and a leading mbox `From ` separator line if present.
fn skip_from_line(data: &[u8]) -> &[u8] {
    let data = if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &data[3..]
    } else {
        data
    };

    if data.starts_with(b"From ") {
        if let Some(pos) = data.iter().position(|&b| b == b'\n') {
            return &data[pos + 1..];
        }
    }
    data
}
