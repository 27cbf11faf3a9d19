//! Note assembly and the per-run orchestration.
//!
//! One run resolves the target notebook, connects to the mailbox, and then
//! turns every unseen message into a note, strictly one message at a time:
//!
//! 1. fetch the raw message (without setting `\Seen`)
//! 2. decode, strip quotes, convert the body to Markdown
//! 3. upload attachments and rewrite `cid:` references to resource links
//! 4. create the note
//! 5. mark the message seen and, if configured, move it
//!
//! A message whose note could not be created is left unseen so the next
//! run picks it up again.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{info, warn};

use crate::config::Config;
use crate::convert::body_to_markdown;
use crate::error::Result;
use crate::joplin::attachments::AttachmentUploader;
use crate::joplin::{resolve_notebook, NoteStore};
use crate::mailbox::{Mailbox, MessageUid};
use crate::model::attachment::ResourceLink;
use crate::model::note::NewNote;
use crate::parser::mime::decode_message;

/// A `cid:` link or image target in rendered Markdown, up to the closing
/// parenthesis or whitespace, so one id never matches the prefix of another.
static CID_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\]\(cid:([^)\s]+)").expect("valid cid-target pattern"));

/// Everything a run needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Folder scanned for unseen messages.
    pub folder: String,
    /// Folder processed messages are moved to, if any.
    pub processed_folder: Option<String>,
    /// Notebook title, matched case-insensitively.
    pub notebook_name: String,
    /// Scratch directory for attachment uploads.
    pub temp_dir: PathBuf,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            folder: config.imap.folder.clone(),
            processed_folder: config.processed_folder().map(String::from),
            notebook_name: config.joplin.notebook_name.clone(),
            temp_dir: config.temp_dir(),
        }
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Unseen messages found.
    pub unseen: usize,
    /// Notes created.
    pub created: usize,
    /// Messages left unseen because fetching or note creation failed.
    pub failed: usize,
}

pub struct Pipeline<'a, S: NoteStore + ?Sized> {
    store: &'a S,
    settings: PipelineSettings,
}

impl<'a, S: NoteStore + ?Sized> Pipeline<'a, S> {
    pub fn new(store: &'a S, settings: PipelineSettings) -> Self {
        Self { store, settings }
    }

    /// Process every unseen message once.
    ///
    /// The notebook is resolved before `connect` is called, so an unknown
    /// notebook aborts the run without touching the mailbox.
    pub fn run<M, F>(&self, connect: F) -> Result<RunStats>
    where
        M: Mailbox,
        F: FnOnce() -> Result<M>,
    {
        let notebook_id = resolve_notebook(self.store, &self.settings.notebook_name)?;
        info!(
            notebook = %self.settings.notebook_name,
            id = %notebook_id,
            "Resolved notebook"
        );

        let mut mailbox = connect()?;
        let stats = self.process_folder(&mut mailbox, &notebook_id);
        if let Err(e) = mailbox.logout() {
            warn!(error = %e, "Logout failed");
        }
        stats
    }

    fn process_folder<M: Mailbox>(&self, mailbox: &mut M, notebook_id: &str) -> Result<RunStats> {
        mailbox.select(&self.settings.folder)?;
        let uids = mailbox.search_unseen()?;
        if uids.is_empty() {
            info!(folder = %self.settings.folder, "No unseen emails found");
        }

        let mut stats = RunStats::default();
        for uid in uids {
            stats.unseen += 1;
            let raw = match mailbox.fetch(uid) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(uid, error = %e, "Failed to fetch message, skipping");
                    stats.failed += 1;
                    continue;
                }
            };

            let note = self.build_note(&raw, notebook_id);
            match self.store.create_note(&note) {
                Ok(note_id) => {
                    info!(uid, note_id = %note_id, title = %note.title, "Note created");
                    stats.created += 1;
                    self.finish_message(mailbox, uid);
                }
                Err(e) => {
                    warn!(uid, error = %e, "Failed to create note, message stays unseen");
                    stats.failed += 1;
                }
            }
        }

        info!(
            unseen = stats.unseen,
            created = stats.created,
            failed = stats.failed,
            "Run finished"
        );
        Ok(stats)
    }

    /// Turn one raw message into the note to submit.
    ///
    /// Never fails: undecodable bodies become placeholder text and failed
    /// attachment uploads are left out of the attachments section.
    pub fn build_note(&self, raw: &[u8], notebook_id: &str) -> NewNote {
        let mail = decode_message(raw);
        info!(subject = %mail.subject, "Processing email");

        let body_markdown = body_to_markdown(&mail.body());

        let uploader = AttachmentUploader::new(self.store, &self.settings.temp_dir);
        let mut links = Vec::new();
        let mut cid_targets = HashMap::new();
        for part in &mail.attachments {
            let Some(link) = uploader.upload(part) else {
                continue;
            };
            if let Some(cid) = &part.content_id {
                cid_targets.insert(cid.clone(), link.target());
            }
            links.push(link);
        }
        let body_markdown = rewrite_cid_targets(&body_markdown, &cid_targets);

        NewNote {
            body: assemble_body(&mail.subject, &links, &body_markdown),
            title: mail.subject,
            parent_id: notebook_id.to_string(),
        }
    }

    /// Post-submission side effects; failures are logged, never escalated.
    fn finish_message<M: Mailbox>(&self, mailbox: &mut M, uid: MessageUid) {
        if let Err(e) = mailbox.mark_seen(uid) {
            warn!(uid, error = %e, "Failed to mark message as seen");
        }
        if let Some(folder) = &self.settings.processed_folder {
            if let Err(e) = mailbox.move_to(uid, folder) {
                warn!(uid, folder = %folder, error = %e, "Failed to move message");
            }
        }
    }
}

/// Point `cid:` targets of uploaded inline parts at their resources.
/// References to unknown ids are left as they are.
pub fn rewrite_cid_targets(markdown: &str, targets: &HashMap<String, String>) -> String {
    if targets.is_empty() {
        return markdown.to_string();
    }
    CID_TARGET
        .replace_all(markdown, |caps: &Captures<'_>| match targets.get(&caps[1]) {
            Some(target) => format!("]({target}"),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Note body: attachments section (when there are links), then the subject
/// heading, then the converted body.
pub fn assemble_body(subject: &str, links: &[ResourceLink], body_markdown: &str) -> String {
    let mut body = String::new();
    if !links.is_empty() {
        body.push_str("# Attachments\n");
        let rendered: Vec<String> = links.iter().map(ResourceLink::to_markdown).collect();
        body.push_str(&rendered.join("\n"));
        body.push_str("\n\n");
    }
    body.push_str(&format!("# {subject}\n\n{body_markdown}\n\n"));
    body
}
