//! File page model: existence, current version, upload and delete.

use url::Url;

use crate::{
    definitions::{DeleteResponse, ImageInfo, QueryResponse, UploadResponse},
    errors::{ErrorInfo, Result, WikiError},
    mediawiki_api::{WikiApi, decode, file_query, params},
};

/// Namespace prefix of file pages.
const FILE_PREFIX: &str = "File:";

/// A file on the wiki, addressed by its name with or without `File:`.
#[derive(Debug)]
pub struct WikiFile<'a, A: WikiApi> {
    api: &'a A,
    name: String,
    exists: bool,
    invalid: bool,
    info: Option<ImageInfo>,
    last_error: Option<ErrorInfo>,
}

impl<'a, A: WikiApi> WikiFile<'a, A> {
    pub fn new<S: AsRef<str>>(api: &'a A, name: S) -> Self {
        let name = name.as_ref();
        Self {
            api,
            name: name.strip_prefix(FILE_PREFIX).unwrap_or(name).to_owned(),
            exists: false,
            invalid: false,
            info: None,
            last_error: None,
        }
    }

    /// File name without the namespace.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full page title (`File:<name>`).
    pub fn title(&self) -> String {
        format!("{}{}", FILE_PREFIX, self.name)
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    /// Current version of the file, if it exists.
    pub fn info(&self) -> Option<&ImageInfo> {
        self.info.as_ref()
    }

    pub fn url(&self) -> Option<&Url> {
        self.info.as_ref().and_then(|i| i.url.as_ref())
    }

    pub fn get_error(&self) -> Option<&ErrorInfo> {
        self.last_error.as_ref()
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            log::warn!("[{}] {}", self.title(), e);
            self.last_error = Some(ErrorInfo::from(e));
        }
        result
    }

    pub async fn refresh(&mut self) -> Result<()> {
        self.last_error = None;
        let result = self.fetch().await;
        self.record(result)
    }

    async fn fetch(&mut self) -> Result<()> {
        let title = self.title();
        let body = self.api.query(file_query(&title)).await?;
        let response: QueryResponse = decode(body)?;
        let page = response
            .query
            .and_then(|q| q.pages.into_iter().next())
            .ok_or_else(|| WikiError::Failed(format!("no page data for {:?}", title)))?;

        if page.invalid {
            self.invalid = true;
            self.exists = false;
            self.info = None;
            return Err(WikiError::InvalidTitle(page.invalidreason.unwrap_or(title)));
        }

        // A missing description page can still have a file (shared repos).
        self.info = page.imageinfo.into_iter().next();
        self.exists = self.info.is_some();
        log::debug!("[{}] exists: {}", title, self.exists);
        Ok(())
    }

    /// Upload the file from a remote url.
    ///
    /// # Arguments
    /// - source -> url the wiki fetches the file from (needs `$wgAllowCopyUploads`)
    /// - comment -> upload log comment
    /// - text -> initial description page text, only used for new files
    /// - overwrite -> replace an existing file instead of stopping on the warning
    pub async fn upload_from_url(
        &mut self,
        source: &Url,
        comment: &str,
        text: Option<&str>,
        overwrite: bool,
    ) -> Result<()> {
        self.last_error = None;
        let result = self.send_upload(source, comment, text, overwrite).await;
        self.record(result)
    }

    async fn send_upload(
        &mut self,
        source: &Url,
        comment: &str,
        text: Option<&str>,
        overwrite: bool,
    ) -> Result<()> {
        if self.invalid {
            return Err(WikiError::InvalidTitle(self.title()));
        }
        let mut p = params([
            ("filename", self.name.as_str()),
            ("url", source.as_str()),
            ("comment", comment),
        ]);
        if let Some(text) = text {
            p.insert("text".into(), text.into());
        }
        if overwrite {
            p.insert("ignorewarnings".into(), "1".into());
        }

        let body = self.api.upload(p).await?;
        let response: UploadResponse = decode(body)?;
        if response.upload.result != "Success" {
            return Err(WikiError::Failed(format!(
                "upload of {:?} returned {} ({})",
                self.name,
                response.upload.result,
                response
                    .upload
                    .warnings
                    .map(|w| w.to_string())
                    .unwrap_or_default()
            )));
        }
        log::info!("[{}] uploaded from {}", self.title(), source);
        self.exists = true;
        Ok(())
    }

    pub async fn delete(&mut self, reason: Option<&str>) -> Result<()> {
        self.last_error = None;
        let result = self.send_delete(reason).await;
        self.record(result)
    }

    async fn send_delete(&mut self, reason: Option<&str>) -> Result<()> {
        let title = self.title();
        let mut p = params([("title", title.as_str())]);
        if let Some(reason) = reason {
            p.insert("reason".into(), reason.into());
        }
        let body = self.api.delete(p).await?;
        let response: DeleteResponse = decode(body)?;
        log::info!("[{}] deleted", response.delete.title);
        self.exists = false;
        self.info = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use serde_json::json;

    fn file_body(url: &str) -> serde_json::Value {
        json!({
            "query": {"pages": [{
                "ns": 6,
                "title": "File:Sausage.jpg",
                "imagerepository": "local",
                "imageinfo": [{
                    "timestamp": "2024-05-01T10:00:00Z",
                    "size": 2048,
                    "url": url,
                    "mime": "image/jpeg"
                }]
            }]}
        })
    }

    #[tokio::test]
    async fn refresh_reads_current_version() {
        let api = MockApi::new([file_body("https://wiki.example.org/images/Sausage.jpg")]);
        let mut file = WikiFile::new(&api, "File:Sausage.jpg");
        assert_eq!(file.name(), "Sausage.jpg");

        file.refresh().await.unwrap();
        assert!(file.exists());
        let info = file.info().unwrap();
        assert_eq!(info.size, Some(2048));
        assert_eq!(info.mime.as_deref(), Some("image/jpeg"));
        assert_eq!(file.url().unwrap().path(), "/images/Sausage.jpg");
        assert_eq!(api.last("query").unwrap()["titles"], "File:Sausage.jpg");
    }

    #[tokio::test]
    async fn missing_file_does_not_exist() {
        let api = MockApi::new([json!({
            "query": {"pages": [{"ns": 6, "title": "File:Nope.png", "missing": true, "imagerepository": ""}]}
        })]);
        let mut file = WikiFile::new(&api, "Nope.png");
        file.refresh().await.unwrap();
        assert!(!file.exists());
        assert!(file.info().is_none());
    }

    #[tokio::test]
    async fn upload_sends_url_and_overwrite_flag() {
        let api = MockApi::new([json!({"upload": {"result": "Success", "filename": "Sausage.jpg"}})]);
        let mut file = WikiFile::new(&api, "Sausage.jpg");
        let source = Url::parse("https://cdn.example.org/sausage.jpg").unwrap();

        file.upload_from_url(&source, "new photo", Some("A sausage."), true)
            .await
            .unwrap();
        let p = api.last("upload").unwrap();
        assert_eq!(p["filename"], "Sausage.jpg");
        assert_eq!(p["url"], "https://cdn.example.org/sausage.jpg");
        assert_eq!(p["ignorewarnings"], "1");
        assert_eq!(p["text"], "A sausage.");
        assert!(file.exists());
    }

    #[tokio::test]
    async fn upload_warning_is_a_failure() {
        let api = MockApi::new([json!({
            "upload": {"result": "Warning", "warnings": {"exists": "Sausage.jpg"}}
        })]);
        let mut file = WikiFile::new(&api, "Sausage.jpg");
        let source = Url::parse("https://cdn.example.org/sausage.jpg").unwrap();

        let err = file
            .upload_from_url(&source, "again", None, false)
            .await
            .unwrap_err();
        assert!(matches!(err, WikiError::Failed(ref m) if m.contains("exists")));
        assert!(!api.last("upload").unwrap().contains_key("ignorewarnings"));
        assert_eq!(file.get_error().unwrap().code, "failed");
    }

    #[tokio::test]
    async fn delete_clears_info() {
        let api = MockApi::new([
            file_body("https://wiki.example.org/images/Sausage.jpg"),
            json!({"delete": {"title": "File:Sausage.jpg", "logid": 9}}),
        ]);
        let mut file = WikiFile::new(&api, "Sausage.jpg");
        file.refresh().await.unwrap();
        file.delete(None).await.unwrap();
        assert!(!file.exists());
        assert!(file.info().is_none());
        assert_eq!(api.last("delete").unwrap()["title"], "File:Sausage.jpg");
    }
}
