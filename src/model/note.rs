//! Note-store request and response payloads.

use serde::{Deserialize, Serialize};

/// Body of `POST /notes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNote {
    pub title: String,
    pub body: String,
    pub parent_id: String,
}

/// A notebook as listed by `GET /folders`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Folder {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// A tag as returned by `GET /search?type=tag`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tag {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

/// Any created object; only the identifier is read back.
#[derive(Debug, Clone, Deserialize)]
pub struct Created {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_page_deserializes() {
        let json = r#"{"items":[{"id":"1","title":"Inbox","parent_id":""}],"has_more":false}"#;
        let page: Page<Folder> = serde_json::from_str(json).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "Inbox");
        assert!(!page.has_more);
    }

    #[test]
    fn test_page_without_has_more() {
        let page: Page<Folder> = serde_json::from_str(r#"{"items":[]}"#).unwrap();
        assert!(page.items.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn test_new_note_serializes() {
        let note = NewNote {
            title: "T".into(),
            body: "# T".into(),
            parent_id: "nb".into(),
        };
        let v = serde_json::to_value(&note).unwrap();
        assert_eq!(v["parent_id"], "nb");
        assert_eq!(v["body"], "# T");
    }
}
