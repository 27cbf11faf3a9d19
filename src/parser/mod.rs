//! Message parsing: MIME decoding on top of `mail-parser`.

pub mod mime;
