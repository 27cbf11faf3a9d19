//! Transient data model: MIME parts, attachments, and note-store payloads.

pub mod attachment;
pub mod mail;
pub mod note;
