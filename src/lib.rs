//! `mailnote` turns unread email into Joplin notes.
//!
//! The library holds the whole transformation: MIME decoding, quote
//! stripping, HTML-to-Markdown conversion with tables, attachment upload,
//! and note assembly, plus the mailbox and note-store boundaries the
//! pipeline drives. Both boundaries are traits so runs can be exercised
//! against in-memory fakes.

pub mod config;
pub mod convert;
pub mod error;
pub mod joplin;
pub mod mailbox;
pub mod model;
pub mod parser;
pub mod pipeline;
