//! Wiki page model with section-aware reads and writes.
//!
//! A [`WikiPage`] owns the page text and the [`SectionIndex`] derived from it.
//! The index is rebuilt every time the text is replaced. Remote failures are
//! returned as `Err` and also kept as the page's last error, readable with
//! [`WikiPage::get_error`].

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use lazy_regex::regex;

use crate::{
    definitions::{DeleteResponse, EditResponse, PageInfo, QueryResponse},
    errors::{ErrorInfo, Result, WikiError},
    mediawiki_api::{WikiApi, decode, format_timestamp, page_query, params},
    sections::{KeyMode, Section, SectionIndex, SectionRef, render},
};

/// Where a page is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageState {
    /// Never fetched.
    #[default]
    Uninitialized,
    /// The wiki rejected the title. Terminal.
    Invalid,
    Missing,
    Existing,
}

/// A wiki page bound to the API it was fetched through.
#[derive(Debug)]
pub struct WikiPage<'a, A: WikiApi> {
    api: &'a A,
    title: String,
    text: Option<String>,
    sections: SectionIndex,
    state: PageState,
    /// Concurrency token: server time of the last read, echoed as `starttimestamp`.
    starttimestamp: Option<DateTime<Utc>>,
    last_error: Option<ErrorInfo>,
}

impl<'a, A: WikiApi> WikiPage<'a, A> {
    /// Create an unfetched page. Call [`WikiPage::refresh`] before reading.
    pub fn new<S: Into<String>>(api: &'a A, title: S) -> Self {
        Self {
            api,
            title: title.into(),
            text: None,
            sections: SectionIndex::default(),
            state: PageState::default(),
            starttimestamp: None,
            last_error: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn exists(&self) -> bool {
        self.state == PageState::Existing
    }

    pub fn is_invalid(&self) -> bool {
        self.state == PageState::Invalid
    }

    /// Last error recorded by a failed operation, if any.
    pub fn get_error(&self) -> Option<&ErrorInfo> {
        self.last_error.as_ref()
    }

    /// Cached text, without fetching.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn sections(&self) -> &SectionIndex {
        &self.sections
    }

    /// Remember a failure before handing it back to the caller.
    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            log::warn!("[{}] {}", self.title, e);
            self.last_error = Some(ErrorInfo::from(e));
        }
        result
    }

    fn replace_text(&mut self, text: String) {
        self.sections = SectionIndex::parse(&text);
        self.text = Some(text);
    }

    /// Fetch the page properties and content, replacing the cached state.
    ///
    /// A missing page is not an error: its text becomes empty. A rejected
    /// title moves the page to [`PageState::Invalid`] and returns
    /// [`WikiError::InvalidTitle`], here and on every later call without
    /// asking the wiki again. Any other failure keeps the cached text.
    pub async fn refresh(&mut self) -> Result<()> {
        self.last_error = None;
        let result = if self.is_invalid() {
            Err(WikiError::InvalidTitle(self.title.clone()))
        } else {
            self.fetch().await
        };
        self.record(result)
    }

    async fn fetch(&mut self) -> Result<()> {
        let body = self.api.query(page_query(&self.title)).await?;
        let response: QueryResponse = decode(body)?;
        let page: PageInfo = response
            .query
            .and_then(|q| q.pages.into_iter().next())
            .ok_or_else(|| WikiError::Failed(format!("no page data for {:?}", self.title)))?;

        if page.invalid {
            self.state = PageState::Invalid;
            self.text = None;
            self.sections = SectionIndex::default();
            self.starttimestamp = None;
            return Err(WikiError::InvalidTitle(
                page.invalidreason.unwrap_or_else(|| self.title.clone()),
            ));
        }

        self.starttimestamp = response.curtimestamp;
        if page.missing {
            log::debug!("[{}] page is missing", self.title);
            self.state = PageState::Missing;
            self.replace_text(String::new());
        } else {
            self.state = PageState::Existing;
            self.replace_text(page.content().unwrap_or_default().to_owned());
            log::debug!(
                "[{}] fetched {} bytes, {} sections",
                self.title,
                self.text.as_deref().map_or(0, str::len),
                self.sections.num_sections()
            );
        }
        Ok(())
    }

    /// Page text, fetching it first when asked to or when never fetched.
    pub async fn get_text(&mut self, refresh: bool) -> Result<&str> {
        if self.is_invalid() {
            return Err(WikiError::InvalidTitle(self.title.clone()));
        }
        if refresh || self.text.is_none() {
            self.refresh().await?;
        }
        Ok(self.text.as_deref().unwrap_or_default())
    }

    /// Text of one section, `None` if `section` does not resolve.
    ///
    /// # Arguments
    /// - section -> index, unique name, or anything convertible into a [`SectionRef`]
    /// - include_heading -> keep the `== heading ==` line
    /// - include_subsections -> also return the deeper sections nested under it
    pub fn get_section<R: Into<SectionRef>>(
        &self,
        section: R,
        include_heading: bool,
        include_subsections: bool,
    ) -> Option<&str> {
        let text = self.text.as_deref()?;
        let range = self
            .sections
            .locate(&section.into(), include_subsections)?;
        Some(render(text, range, include_heading))
    }

    /// `get_section` with the usual defaults: no heading, with subsections.
    pub fn section<R: Into<SectionRef>>(&self, section: R) -> Option<&str> {
        self.get_section(section, false, true)
    }

    /// Every section (each with its subsections), keyed as asked.
    pub fn get_all_sections(&self, include_heading: bool, mode: KeyMode) -> Vec<(SectionRef, &str)> {
        (0..self.sections.num_sections())
            .filter_map(|idx| {
                let key = match mode {
                    KeyMode::ByIndex => SectionRef::Index(idx),
                    KeyMode::ByName => SectionRef::Name(self.sections.name_at(idx)?.to_owned()),
                };
                let text = self.get_section(SectionRef::Index(idx), include_heading, true)?;
                Some((key, text))
            })
            .collect()
    }

    pub fn get_num_sections(&self) -> usize {
        self.sections.num_sections()
    }

    /// Offsets, lengths and depths of every section, keyed by unique name.
    pub fn get_section_offsets(&self) -> &IndexMap<String, Section> {
        self.sections.by_name()
    }

    /// Category names linked from the current text, in order of appearance.
    pub fn categories(&self) -> Vec<String> {
        let Some(text) = self.text.as_deref() else {
            return vec![];
        };
        regex!(r"\[\[\s*Category\s*:\s*([^\]|]+?)\s*(?:\|[^\]]*)?\]\]"i)
            .captures_iter(text)
            .map(|c| c[1].to_owned())
            .collect()
    }

    /// Replace the page's category links with `categories` and save the page.
    ///
    /// Existing `[[Category:...]]` links are removed wherever they are; the new
    /// ones go at the end, one per line. An empty list clears them all.
    pub async fn set_categories(&mut self, categories: &[&str], summary: Option<&str>) -> Result<()> {
        let text = with_categories(self.get_text(false).await?, categories);
        self.set_text(&text, None, false, summary).await
    }

    /// Link the page to `categories` on top of the ones it already has.
    pub async fn add_categories(&mut self, categories: &[&str], summary: Option<&str>) -> Result<()> {
        self.get_text(false).await?;
        let mut merged = self.categories();
        for cat in categories.iter().map(|c| c.trim()) {
            if !merged.iter().any(|m| m == cat) {
                merged.push(cat.to_owned());
            }
        }
        let merged: Vec<&str> = merged.iter().map(String::as_str).collect();
        self.set_categories(&merged, summary).await
    }

    /// Value of the edit `section` param for `section`.
    ///
    /// Indexes and `new` pass through; names must exist in the current index.
    fn resolve_section(&self, section: &SectionRef) -> Result<String> {
        match section {
            SectionRef::Index(idx) => Ok(idx.to_string()),
            SectionRef::New => Ok("new".into()),
            SectionRef::Name(name) if name == "new" => Ok("new".into()),
            SectionRef::Name(name) => self
                .sections
                .position_of(name)
                .map(|idx| idx.to_string())
                .ok_or_else(|| WikiError::SectionNotFound(name.clone())),
        }
    }

    /// Replace the whole page, or one section of it.
    ///
    /// Whole-page edits update the cached text. Section edits do not: call
    /// [`WikiPage::refresh`] to see the merged page.
    pub async fn set_text(
        &mut self,
        text: &str,
        section: Option<SectionRef>,
        minor: bool,
        summary: Option<&str>,
    ) -> Result<()> {
        self.last_error = None;
        let result = self.send_edit(text, section.as_ref(), minor, summary).await;
        self.record(result)
    }

    async fn send_edit(
        &mut self,
        text: &str,
        section: Option<&SectionRef>,
        minor: bool,
        summary: Option<&str>,
    ) -> Result<()> {
        if self.is_invalid() {
            return Err(WikiError::InvalidTitle(self.title.clone()));
        }

        let mut p = params([("title", self.title.as_str()), ("text", text)]);
        if let Some(section) = section {
            p.insert("section".into(), self.resolve_section(section)?);
        }
        if minor {
            p.insert("minor".into(), "1".into());
        }
        if let Some(summary) = summary {
            p.insert("summary".into(), summary.into());
        }
        if let Some(ts) = &self.starttimestamp {
            p.insert("starttimestamp".into(), format_timestamp(ts));
        }
        match self.state {
            PageState::Existing => p.insert("nocreate".into(), "1".into()),
            PageState::Missing => p.insert("createonly".into(), "1".into()),
            _ => None,
        };

        let body = self.api.edit(p).await?;
        let response: EditResponse = decode(body)?;
        if response.edit.result != "Success" {
            return Err(WikiError::Failed(format!(
                "edit of {:?} returned {}",
                self.title, response.edit.result
            )));
        }

        log::info!(
            "[{}] edit saved{}",
            self.title,
            section.map(|s| format!(" (section {})", s)).unwrap_or_default()
        );
        if let Some(ts) = response.edit.newtimestamp {
            self.starttimestamp = Some(ts);
        }
        self.state = PageState::Existing;
        if section.is_none() {
            self.replace_text(text.to_owned());
        }
        Ok(())
    }

    /// Replace one section.
    pub async fn set_section<R: Into<SectionRef>>(
        &mut self,
        text: &str,
        section: R,
        summary: Option<&str>,
        minor: bool,
    ) -> Result<()> {
        self.set_text(text, Some(section.into()), minor, summary)
            .await
    }

    /// Append a new section titled `name`.
    pub async fn new_section(&mut self, name: &str, text: &str) -> Result<()> {
        self.set_text(text, Some(SectionRef::New), false, Some(name))
            .await
    }

    /// Delete the page. On success the page is [`PageState::Missing`].
    pub async fn delete(&mut self, reason: Option<&str>) -> Result<()> {
        self.last_error = None;
        let result = self.send_delete(reason).await;
        self.record(result)
    }

    async fn send_delete(&mut self, reason: Option<&str>) -> Result<()> {
        let mut p = params([("title", self.title.as_str())]);
        if let Some(reason) = reason {
            p.insert("reason".into(), reason.into());
        }
        let body = self.api.delete(p).await?;
        let response: DeleteResponse = decode(body)?;
        log::info!("[{}] deleted", response.delete.title);
        self.state = PageState::Missing;
        Ok(())
    }
}

/// `text` without its category links, followed by one link per category.
fn with_categories(text: &str, categories: &[&str]) -> String {
    let stripped = regex!(r"\n?\[\[\s*Category\s*:[^\]]*\]\]"i).replace_all(text, "");
    let mut out = stripped.trim_end().to_owned();
    for cat in categories.iter().map(|c| c.trim()).filter(|c| !c.is_empty()) {
        out.push_str(&format!("\n[[Category:{}]]", cat));
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
