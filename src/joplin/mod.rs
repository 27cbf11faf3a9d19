//! Note-store boundary: the [`NoteStore`] trait, its HTTP client, and the
//! uploaders built on top of it.

pub mod attachments;
pub mod client;
pub mod file_note;

use std::path::Path;

use crate::error::{MailNoteError, Result};
use crate::model::note::{Folder, NewNote, Tag};

/// Operations the pipeline and the file uploader need from the note store.
///
/// Every call is blocking. Implementations report any non-success answer as
/// an error; callers decide whether it is fatal.
pub trait NoteStore {
    /// All notebooks, across every page of the listing.
    fn list_folders(&self) -> Result<Vec<Folder>>;

    /// Upload the file at `path` as a resource titled `filename`; returns the
    /// resource id.
    fn upload_resource(&self, path: &Path, filename: &str) -> Result<String>;

    /// Create a note; returns its id.
    fn create_note(&self, note: &NewNote) -> Result<String>;

    /// Tags whose title matches `title` according to the store's search.
    fn find_tags(&self, title: &str) -> Result<Vec<Tag>>;

    /// Create a tag; returns its id.
    fn create_tag(&self, title: &str) -> Result<String>;

    /// Attach an existing tag to an existing note.
    fn tag_note(&self, tag_id: &str, note_id: &str) -> Result<()>;
}

impl<S: NoteStore + ?Sized> NoteStore for &S {
    fn list_folders(&self) -> Result<Vec<Folder>> {
        (**self).list_folders()
    }
    fn upload_resource(&self, path: &Path, filename: &str) -> Result<String> {
        (**self).upload_resource(path, filename)
    }
    fn create_note(&self, note: &NewNote) -> Result<String> {
        (**self).create_note(note)
    }
    fn find_tags(&self, title: &str) -> Result<Vec<Tag>> {
        (**self).find_tags(title)
    }
    fn create_tag(&self, title: &str) -> Result<String> {
        (**self).create_tag(title)
    }
    fn tag_note(&self, tag_id: &str, note_id: &str) -> Result<()> {
        (**self).tag_note(tag_id, note_id)
    }
}

/// Find the id of the notebook whose title equals `name`, ignoring case.
pub fn resolve_notebook<S: NoteStore + ?Sized>(store: &S, name: &str) -> Result<String> {
    let wanted = name.to_lowercase();
    store
        .list_folders()?
        .into_iter()
        .find(|folder| folder.title.to_lowercase() == wanted)
        .map(|folder| folder.id)
        .ok_or_else(|| MailNoteError::NotebookNotFound(name.to_string()))
}

/// Id of the tag titled `title` (ignoring case), created if none exists.
pub fn find_or_create_tag<S: NoteStore + ?Sized>(store: &S, title: &str) -> Result<String> {
    let wanted = title.to_lowercase();
    let existing = store
        .find_tags(title)?
        .into_iter()
        .find(|tag| tag.title.to_lowercase() == wanted);
    match existing {
        Some(tag) => Ok(tag.id),
        None => store.create_tag(title),
    }
}
