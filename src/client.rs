use futures::future::join_all;

use crate::{
    errors::{Result, WikiError},
    file::WikiFile,
    mediawiki_api::WikiApi,
    page::WikiPage,
    reqwest_client::{ClientConfig, HttpApi},
};

/// Entry point: owns the API handle that every page and file borrows.
#[derive(Debug)]
pub struct Wikimate<A: WikiApi> {
    api: A,
}

impl Wikimate<HttpApi> {
    /// Client over HTTP for the wiki described by `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        log::info!("Using api at {}", config.api_url);
        Ok(Self::new(HttpApi::new(config)?))
    }
}

impl<A: WikiApi> Wikimate<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetch a page.
    ///
    /// A title the wiki rejects still gives a page back, in the
    /// [`crate::PageState::Invalid`] state with the reason in `get_error()`.
    pub async fn get_page<S: Into<String>>(&self, title: S) -> Result<WikiPage<'_, A>> {
        let mut page = WikiPage::new(&self.api, title);
        match page.refresh().await {
            Ok(()) | Err(WikiError::InvalidTitle(_)) => Ok(page),
            Err(e) => Err(e),
        }
    }

    /// Fetch several pages concurrently, results in input order.
    pub async fn get_pages<I, S>(&self, titles: I) -> Vec<Result<WikiPage<'_, A>>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        join_all(titles.into_iter().map(|title| self.get_page(title))).await
    }

    /// Fetch a file, by name with or without the `File:` prefix.
    pub async fn get_file<S: AsRef<str>>(&self, name: S) -> Result<WikiFile<'_, A>> {
        let mut file = WikiFile::new(&self.api, name);
        match file.refresh().await {
            Ok(()) | Err(WikiError::InvalidTitle(_)) => Ok(file),
            Err(e) => Err(e),
        }
    }
}
