//! In-memory fakes of the mailbox and note store, plus fixture helpers.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use mailnote::error::{MailNoteError, Result};
use mailnote::joplin::NoteStore;
use mailnote::mailbox::{Mailbox, MessageUid};
use mailnote::model::note::{Folder, NewNote, Tag};

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture(name: &str) -> Vec<u8> {
    std::fs::read(fixture_path(name)).unwrap()
}

// ── Note store ──────────────────────────────────────────────────

/// A resource upload as the store saw it.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub path: PathBuf,
    pub content: Vec<u8>,
    /// Whether `<path>.lock` existed while the upload ran.
    pub lock_present: bool,
}

#[derive(Default)]
pub struct FakeStore {
    pub folders: Vec<Folder>,
    /// Resource id to return per uploaded filename; others get `res<N>`.
    pub resource_ids: HashMap<String, String>,
    /// Filenames whose upload answers with an error status.
    pub failing_uploads: HashSet<String>,
    /// Note titles whose creation answers with an error status.
    pub failing_notes: HashSet<String>,

    pub list_calls: Cell<usize>,
    pub uploads: RefCell<Vec<Upload>>,
    pub notes: RefCell<Vec<NewNote>>,
    pub tags: RefCell<Vec<Tag>>,
    pub taggings: RefCell<Vec<(String, String)>>,
}

impl FakeStore {
    /// A store holding one notebook per title, with ids `nb0`, `nb1`, ...
    pub fn with_notebooks(titles: &[&str]) -> Self {
        Self {
            folders: titles
                .iter()
                .enumerate()
                .map(|(i, title)| Folder {
                    id: format!("nb{i}"),
                    title: title.to_string(),
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn note(&self, index: usize) -> NewNote {
        self.notes.borrow()[index].clone()
    }
}

fn status_error(endpoint: &str) -> MailNoteError {
    MailNoteError::Status {
        endpoint: endpoint.to_string(),
        status: 500,
        body: "internal error".to_string(),
    }
}

impl NoteStore for FakeStore {
    fn list_folders(&self) -> Result<Vec<Folder>> {
        self.list_calls.set(self.list_calls.get() + 1);
        Ok(self.folders.clone())
    }

    fn upload_resource(&self, path: &Path, filename: &str) -> Result<String> {
        let content = std::fs::read(path).map_err(|e| MailNoteError::io(path, e))?;
        let mut lock = path.as_os_str().to_owned();
        lock.push(".lock");
        let mut uploads = self.uploads.borrow_mut();
        uploads.push(Upload {
            filename: filename.to_string(),
            path: path.to_path_buf(),
            content,
            lock_present: Path::new(&lock).exists(),
        });

        if self.failing_uploads.contains(filename) {
            return Err(status_error("/resources"));
        }
        Ok(self
            .resource_ids
            .get(filename)
            .cloned()
            .unwrap_or_else(|| format!("res{}", uploads.len())))
    }

    fn create_note(&self, note: &NewNote) -> Result<String> {
        if self.failing_notes.contains(&note.title) {
            return Err(status_error("/notes"));
        }
        let mut notes = self.notes.borrow_mut();
        notes.push(note.clone());
        Ok(format!("note{}", notes.len()))
    }

    fn find_tags(&self, title: &str) -> Result<Vec<Tag>> {
        let wanted = title.to_lowercase();
        Ok(self
            .tags
            .borrow()
            .iter()
            .filter(|tag| tag.title.to_lowercase().contains(&wanted))
            .cloned()
            .collect())
    }

    fn create_tag(&self, title: &str) -> Result<String> {
        let mut tags = self.tags.borrow_mut();
        let id = format!("tag{}", tags.len() + 1);
        tags.push(Tag {
            id: id.clone(),
            title: title.to_string(),
        });
        Ok(id)
    }

    fn tag_note(&self, tag_id: &str, note_id: &str) -> Result<()> {
        self.taggings
            .borrow_mut()
            .push((tag_id.to_string(), note_id.to_string()));
        Ok(())
    }
}

// ── Mailbox ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeMailbox {
    pub messages: HashMap<MessageUid, Vec<u8>>,
    pub unseen: Vec<MessageUid>,
    pub failing_fetches: HashSet<MessageUid>,
    pub failing_moves: bool,

    pub selected: Option<String>,
    pub fetched: Vec<MessageUid>,
    pub seen: Vec<MessageUid>,
    pub moved: Vec<(MessageUid, String)>,
    pub logged_out: bool,
}

impl FakeMailbox {
    /// A mailbox whose messages are all unseen.
    pub fn with_messages(messages: Vec<(MessageUid, Vec<u8>)>) -> Self {
        let unseen = messages.iter().map(|(uid, _)| *uid).collect();
        Self {
            messages: messages.into_iter().collect(),
            unseen,
            ..Self::default()
        }
    }
}

impl Mailbox for FakeMailbox {
    fn select(&mut self, folder: &str) -> Result<()> {
        self.selected = Some(folder.to_string());
        Ok(())
    }

    fn search_unseen(&mut self) -> Result<Vec<MessageUid>> {
        let mut uids = self.unseen.clone();
        uids.sort_unstable();
        Ok(uids)
    }

    fn fetch(&mut self, uid: MessageUid) -> Result<Vec<u8>> {
        self.fetched.push(uid);
        if self.failing_fetches.contains(&uid) {
            return Err(MailNoteError::Mailbox(format!("fetch of UID {uid} failed")));
        }
        self.messages
            .get(&uid)
            .cloned()
            .ok_or_else(|| MailNoteError::Mailbox(format!("no message with UID {uid}")))
    }

    fn mark_seen(&mut self, uid: MessageUid) -> Result<()> {
        self.seen.push(uid);
        self.unseen.retain(|&u| u != uid);
        Ok(())
    }

    fn move_to(&mut self, uid: MessageUid, folder: &str) -> Result<()> {
        if self.failing_moves {
            return Err(MailNoteError::Mailbox("MOVE not supported".into()));
        }
        self.moved.push((uid, folder.to_string()));
        Ok(())
    }

    fn logout(&mut self) -> Result<()> {
        self.logged_out = true;
        Ok(())
    }
}
