//! Mail-retrieval boundary.

pub mod imap;

use crate::error::Result;

/// Per-session message identifier (an IMAP UID), not the `Message-ID` header.
pub type MessageUid = u32;

/// The mailbox operations the pipeline drives, in the order it uses them.
pub trait Mailbox {
    fn select(&mut self, folder: &str) -> Result<()>;

    /// UIDs of unseen messages in the selected folder, ascending.
    fn search_unseen(&mut self) -> Result<Vec<MessageUid>>;

    /// Raw RFC 5322 bytes of one message. Must not set `\Seen`.
    fn fetch(&mut self, uid: MessageUid) -> Result<Vec<u8>>;

    fn mark_seen(&mut self, uid: MessageUid) -> Result<()>;

    fn move_to(&mut self, uid: MessageUid, folder: &str) -> Result<()>;

    fn logout(&mut self) -> Result<()>;
}

impl<M: Mailbox + ?Sized> Mailbox for &mut M {
    fn select(&mut self, folder: &str) -> Result<()> {
        (**self).select(folder)
    }
    fn search_unseen(&mut self) -> Result<Vec<MessageUid>> {
        (**self).search_unseen()
    }
    fn fetch(&mut self, uid: MessageUid) -> Result<Vec<u8>> {
        (**self).fetch(uid)
    }
    fn mark_seen(&mut self, uid: MessageUid) -> Result<()> {
        (**self).mark_seen(uid)
    }
    fn move_to(&mut self, uid: MessageUid, folder: &str) -> Result<()> {
        (**self).move_to(uid, folder)
    }
    fn logout(&mut self) -> Result<()> {
        (**self).logout()
    }
}
