//! IMAP over TLS.

use std::net::TcpStream;

use imap::Session;
use native_tls::{TlsConnector, TlsStream};
use tracing::{debug, info};

use super::{Mailbox, MessageUid};
use crate::config::ImapConfig;
use crate::error::{MailNoteError, Result};

pub struct ImapMailbox {
    session: Session<TlsStream<TcpStream>>,
}

impl ImapMailbox {
    /// Connect to `server:port` with TLS and log in.
    pub fn connect(config: &ImapConfig) -> Result<Self> {
        info!(server = %config.server, port = config.port, "Connecting to IMAP server");
        let tls = TlsConnector::builder().build()?;
        let client = imap::connect(
            (config.server.as_str(), config.port),
            config.server.as_str(),
            &tls,
        )?;
        let session = client
            .login(&config.user, &config.password)
            .map_err(|(e, _client)| e)?;
        info!(user = %config.user, "Logged in");
        Ok(Self { session })
    }
}

impl Mailbox for ImapMailbox {
    fn select(&mut self, folder: &str) -> Result<()> {
        let mailbox = self.session.select(folder)?;
        debug!(folder, exists = mailbox.exists, "Selected folder");
        Ok(())
    }

    fn search_unseen(&mut self) -> Result<Vec<MessageUid>> {
        let mut uids: Vec<MessageUid> = self.session.uid_search("UNSEEN")?.into_iter().collect();
        uids.sort_unstable();
        info!(count = uids.len(), "Found unseen messages");
        Ok(uids)
    }

    fn fetch(&mut self, uid: MessageUid) -> Result<Vec<u8>> {
        // BODY.PEEK leaves \Seen alone until the note exists
        let fetches = self.session.uid_fetch(uid.to_string(), "BODY.PEEK[]")?;
        fetches
            .iter()
            .find_map(|fetch| fetch.body())
            .map(<[u8]>::to_vec)
            .ok_or_else(|| MailNoteError::Mailbox(format!("server returned no body for UID {uid}")))
    }

    fn mark_seen(&mut self, uid: MessageUid) -> Result<()> {
        self.session.uid_store(uid.to_string(), "+FLAGS (\\Seen)")?;
        debug!(uid, "Marked as seen");
        Ok(())
    }

    fn move_to(&mut self, uid: MessageUid, folder: &str) -> Result<()> {
        self.session.uid_mv(uid.to_string(), folder)?;
        info!(uid, folder, "Moved message");
        Ok(())
    }

    fn logout(&mut self) -> Result<()> {
        self.session.logout()?;
        info!("Logged out");
        Ok(())
    }
}
