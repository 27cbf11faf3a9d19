//! Blocking HTTP client for the Joplin data API.
//!
//! Every request carries the access token as the `token` query parameter.
//! Only status 200 counts as success; anything else becomes
//! [`MailNoteError::Status`] with the response body attached.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use super::NoteStore;
use crate::config::JoplinConfig;
use crate::error::{MailNoteError, Result};
use crate::model::note::{Created, Folder, NewNote, Page, Tag};

pub struct JoplinClient {
    http: Client,
    base_url: String,
    token: String,
}

impl fmt::Debug for JoplinClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoplinClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl JoplinClient {
    pub fn new(config: &JoplinConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn get(&self, endpoint: &str) -> RequestBuilder {
        debug!(endpoint, "GET");
        self.http
            .get(format!("{}{endpoint}", self.base_url))
            .query(&[("token", self.token.as_str())])
    }

    fn post(&self, endpoint: &str) -> RequestBuilder {
        debug!(endpoint, "POST");
        self.http
            .post(format!("{}{endpoint}", self.base_url))
            .query(&[("token", self.token.as_str())])
    }
}

/// Fail unless the store answered 200.
fn check(endpoint: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(MailNoteError::Status {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body,
    })
}

fn read_json<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T> {
    let text = check(endpoint, response)?.text()?;
    Ok(serde_json::from_str(&text)?)
}

impl NoteStore for JoplinClient {
    fn list_folders(&self) -> Result<Vec<Folder>> {
        let mut folders = Vec::new();
        let mut page: u32 = 1;
        loop {
            let response = self.get("/folders").query(&[("page", page)]).send()?;
            let listing: Page<Folder> = read_json("/folders", response)?;
            folders.extend(listing.items);
            if !listing.has_more {
                break;
            }
            page += 1;
        }
        debug!(count = folders.len(), "Listed notebooks");
        Ok(folders)
    }

    fn upload_resource(&self, path: &Path, filename: &str) -> Result<String> {
        let file = std::fs::File::open(path).map_err(|e| MailNoteError::io(path, e))?;
        let props = json!({ "title": filename }).to_string();
        let form = Form::new()
            .part("data", Part::reader(file).file_name(filename.to_string()))
            .text("props", props);

        // The form owns the file handle; it is closed when the request is dropped.
        let response = self.post("/resources").multipart(form).send()?;
        let created: Created = read_json("/resources", response)?;
        Ok(created.id)
    }

    fn create_note(&self, note: &NewNote) -> Result<String> {
        let response = self.post("/notes").json(note).send()?;
        let created: Created = read_json("/notes", response)?;
        Ok(created.id)
    }

    fn find_tags(&self, title: &str) -> Result<Vec<Tag>> {
        let response = self
            .get("/search")
            .query(&[("query", title), ("type", "tag")])
            .send()?;
        let listing: Page<Tag> = read_json("/search", response)?;
        Ok(listing.items)
    }

    fn create_tag(&self, title: &str) -> Result<String> {
        let response = self.post("/tags").json(&json!({ "title": title })).send()?;
        let created: Created = read_json("/tags", response)?;
        Ok(created.id)
    }

    fn tag_note(&self, tag_id: &str, note_id: &str) -> Result<()> {
        let endpoint = format!("/tags/{tag_id}/notes");
        let response = self.post(&endpoint).json(&json!({ "id": note_id })).send()?;
        check(&endpoint, response)?;
        Ok(())
    }
}
