//! Upload a single file from disk as a note.
//!
//! Text files become the note body; anything else is uploaded as a resource
//! and linked from the body. A `<file>.lock` marker exists while the upload
//! runs so folder watchers can skip the file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{find_or_create_tag, resolve_notebook, NoteStore};
use crate::error::{MailNoteError, Result};
use crate::model::attachment::ResourceLink;
use crate::model::note::NewNote;

/// Extensions whose content is used verbatim as the note body.
pub const DEFAULT_PLAIN_EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

/// Extensions embedded as images rather than linked.
const IMAGE_EXTENSIONS: &[&str] = &[
    "bmp", "gif", "heic", "jpeg", "jpg", "png", "svg", "tif", "tiff", "webp",
];

/// What to upload and where.
#[derive(Debug, Clone)]
pub struct FileUploadRequest {
    pub path: PathBuf,
    /// Notebook title, matched case-insensitively.
    pub notebook: String,
    /// Tag titles applied to the new note.
    pub tags: Vec<String>,
    /// Extensions (without the dot) treated as plain text.
    pub plain_extensions: Vec<String>,
}

impl FileUploadRequest {
    pub fn new(path: impl Into<PathBuf>, notebook: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            notebook: notebook.into(),
            tags: Vec::new(),
            plain_extensions: DEFAULT_PLAIN_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }

    fn is_plain(&self, extension: &str) -> bool {
        self.plain_extensions
            .iter()
            .any(|e| e.trim().trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}

/// Create a note from `request.path`; returns the note id.
///
/// On success the file and its lock are removed. On failure only the lock
/// is removed and the file stays for the next attempt.
pub fn upload_file_as_note<S: NoteStore + ?Sized>(
    store: &S,
    request: &FileUploadRequest,
) -> Result<String> {
    let lock = lock_path(&request.path);
    std::fs::File::create(&lock).map_err(|e| MailNoteError::io(&lock, e))?;

    match create_file_note(store, request) {
        Ok(note_id) => {
            remove_logged(&request.path);
            remove_logged(&lock);
            Ok(note_id)
        }
        Err(e) => {
            remove_logged(&lock);
            Err(e)
        }
    }
}

fn create_file_note<S: NoteStore + ?Sized>(store: &S, request: &FileUploadRequest) -> Result<String> {
    let path = &request.path;
    let notebook_id = resolve_notebook(store, &request.notebook)?;

    let title = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    let body = if request.is_plain(&extension) {
        let bytes = std::fs::read(path).map_err(|e| MailNoteError::io(path, e))?;
        String::from_utf8_lossy(&bytes).into_owned()
    } else {
        let resource_id = store.upload_resource(path, &title)?;
        ResourceLink {
            filename: title.clone(),
            resource_id,
            is_image: IMAGE_EXTENSIONS.contains(&extension.as_str()),
        }
        .to_markdown()
    };

    let note_id = store.create_note(&NewNote {
        title,
        body,
        parent_id: notebook_id,
    })?;
    info!(file = %path.display(), note_id = %note_id, "Created note from file");

    for tag in request.tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        match find_or_create_tag(store, tag).and_then(|tag_id| store.tag_note(&tag_id, &note_id)) {
            Ok(()) => debug!(tag, "Tagged note"),
            Err(e) => warn!(tag, error = %e, "Failed to tag note"),
        }
    }

    Ok(note_id)
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

fn remove_logged(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "File remove failed");
    }
}
