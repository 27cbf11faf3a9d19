//! Attachment upload: one resource per attachment part.

use std::path::{Path, PathBuf};

use humansize::{format_size, BINARY};
use tracing::{info, warn};

use super::NoteStore;
use crate::model::attachment::{AttachmentPart, ResourceLink};

/// Longest scratch file name written to the temp directory.
const MAX_FILENAME_LEN: usize = 150;

/// Uploads attachment parts through a scratch file in `temp_dir`.
pub struct AttachmentUploader<'a, S: NoteStore + ?Sized> {
    store: &'a S,
    temp_dir: PathBuf,
}

impl<'a, S: NoteStore + ?Sized> AttachmentUploader<'a, S> {
    pub fn new(store: &'a S, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            temp_dir: temp_dir.into(),
        }
    }

    /// Upload one part and return the link to the new resource.
    ///
    /// Any failure is logged and yields `None`; the scratch file is removed
    /// on every path once it has been written.
    pub fn upload(&self, part: &AttachmentPart) -> Option<ResourceLink> {
        let path = self
            .temp_dir
            .join(sanitize_filename_part(&part.filename, MAX_FILENAME_LEN));
        if let Err(e) = std::fs::write(&path, &part.payload) {
            warn!(
                filename = %part.filename,
                path = %path.display(),
                error = %e,
                "Failed to write attachment to temp file"
            );
            return None;
        }

        let uploaded = self.store.upload_resource(&path, &part.filename);
        remove_temp_file(&path);

        match uploaded {
            Ok(resource_id) => {
                info!(
                    filename = %part.filename,
                    size = %format_size(part.payload.len(), BINARY),
                    resource_id = %resource_id,
                    "Uploaded attachment"
                );
                Some(ResourceLink {
                    filename: part.filename.clone(),
                    resource_id,
                    is_image: part.is_image(),
                })
            }
            Err(e) => {
                warn!(filename = %part.filename, error = %e, "Failed to upload attachment");
                None
            }
        }
    }
}

fn remove_temp_file(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "Failed to remove temp file");
    }
}

/// Make a filename safe to use as a single path component.
///
/// Keeps alphanumerics and `-._@`, replaces everything else with `_`,
/// strips leading dots so the result can never name a parent or hidden
/// entry, and truncates to `max_len` characters.
pub fn sanitize_filename_part(s: &str, max_len: usize) -> String {
    let sanitized: String = s
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '.' || c == '_' || c == '@' {
                c
            } else {
                '_'
            }
        })
        .skip_while(|&c| c == '.')
        .take(max_len)
        .collect();

    if sanitized.is_empty() {
        "attachment".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename_part("hello world.pdf", 40), "hello_world.pdf");
        assert_eq!(sanitize_filename_part("a/b\\c.png", 40), "a_b_c.png");
        assert_eq!(sanitize_filename_part("résumé.txt", 40), "résumé.txt");
    }

    #[test]
    fn test_sanitize_never_escapes_directory() {
        assert_eq!(sanitize_filename_part("..", 40), "attachment");
        assert_eq!(sanitize_filename_part("../../etc/passwd", 40), "_.._etc_passwd");
        assert_eq!(sanitize_filename_part(".hidden", 40), "hidden");
        assert_eq!(sanitize_filename_part("", 40), "attachment");
    }

    #[test]
    fn test_sanitize_truncates() {
        assert_eq!(sanitize_filename_part("abcdef", 3), "abc");
    }
}
