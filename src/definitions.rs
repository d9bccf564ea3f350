use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

// Response shapes for `format=json&formatversion=2`.

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct QueryResponse {
    /// Server time of the request, requested with `curtimestamp=1`.
    #[serde(default)]
    pub curtimestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub query: Option<QueryBody>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct QueryBody {
    #[serde(default)]
    pub pages: Vec<PageInfo>,
    #[serde(default)]
    pub tokens: Option<Tokens>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Tokens {
    pub csrftoken: String,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct PageInfo {
    #[serde(default)]
    pub pageid: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub missing: bool,
    #[serde(default)]
    pub invalid: bool,
    #[serde(default)]
    pub invalidreason: Option<String>,
    #[serde(default)]
    pub touched: Option<DateTime<Utc>>,
    #[serde(default)]
    pub revisions: Vec<Revision>,
    #[serde(default)]
    pub imageinfo: Vec<ImageInfo>,
}

impl PageInfo {
    /// Content of the latest revision's main slot, if any.
    pub fn content(&self) -> Option<&str> {
        self.revisions.first().and_then(Revision::content)
    }
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Revision {
    #[serde(default)]
    pub revid: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub slots: Option<Slots>,
    /// Older wikis without `rvslots` put the content on the revision itself.
    #[serde(default)]
    pub content: Option<String>,
}

impl Revision {
    pub fn content(&self) -> Option<&str> {
        self.slots
            .as_ref()
            .map(|slots| slots.main.content.as_str())
            .or(self.content.as_deref())
    }
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Slots {
    pub main: Slot,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Slot {
    #[serde(default)]
    pub content: String,
}

/// Current version of a file, from `prop=imageinfo`.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct ImageInfo {
    #[serde(default)]
    pub url: Option<Url>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct EditResponse {
    pub edit: EditResult,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct EditResult {
    pub result: String,
    #[serde(default)]
    pub pageid: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    /// Only present when the edit changed the page.
    #[serde(default)]
    pub newtimestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub nochange: bool,
    #[serde(default)]
    pub new: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteResponse {
    pub delete: DeleteResult,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteResult {
    pub title: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub logid: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UploadResponse {
    pub upload: UploadResult,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UploadResult {
    pub result: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub warnings: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_with_slot_content() {
        let page: PageInfo = serde_json::from_value(json!({
            "pageid": 12,
            "ns": 0,
            "title": "Sausages",
            "revisions": [{
                "revid": 99,
                "timestamp": "2024-05-01T10:00:00Z",
                "slots": {"main": {"contentmodel": "wikitext", "content": "Intro"}}
            }]
        }))
        .unwrap();
        assert_eq!(page.content(), Some("Intro"));
        assert!(!page.missing);
        assert_eq!(page.revisions[0].revid, Some(99));
    }

    #[test]
    fn missing_and_invalid_flags() {
        let missing: PageInfo =
            serde_json::from_value(json!({"ns": 0, "title": "Nope", "missing": true})).unwrap();
        assert!(missing.missing);
        assert_eq!(missing.content(), None);

        let invalid: PageInfo = serde_json::from_value(json!({
            "title": "<>",
            "invalidreason": "The requested page title contains invalid characters",
            "invalid": true
        }))
        .unwrap();
        assert!(invalid.invalid);
    }

    #[test]
    fn edit_result_without_new_timestamp() {
        let r: EditResponse = serde_json::from_value(json!({
            "edit": {"result": "Success", "pageid": 3, "title": "X", "nochange": true}
        }))
        .unwrap();
        assert!(r.edit.nochange);
        assert_eq!(r.edit.newtimestamp, None);
    }
}
