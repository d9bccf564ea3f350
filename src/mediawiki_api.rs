use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{collections::BTreeMap, future::Future};

use crate::errors::{ApiErrorInfo, Result, WikiError};

/// Request parameters, without `action`/`format` (the transport adds those).
pub type Params = BTreeMap<String, String>;

/// The four API actions the page and file models need.
///
/// Implementations own the transport: encoding, authentication, CSRF tokens.
/// They return the decoded JSON body, error payloads included; the models
/// turn `{"error": ...}` bodies into [`WikiError::Api`].
pub trait WikiApi {
    fn query(&self, params: Params) -> impl Future<Output = Result<Value>> + Send;
    fn edit(&self, params: Params) -> impl Future<Output = Result<Value>> + Send;
    fn delete(&self, params: Params) -> impl Future<Output = Result<Value>> + Send;
    fn upload(&self, params: Params) -> impl Future<Output = Result<Value>> + Send;
}

/// Build a `Params` map from `(key, value)` pairs.
pub fn params<K, V, I>(pairs: I) -> Params
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Params to read a page's properties and current content.
pub fn page_query(title: &str) -> Params {
    params([
        ("prop", "info|revisions"),
        ("titles", title),
        ("rvprop", "content|timestamp"),
        ("rvslots", "main"),
        ("curtimestamp", "1"),
    ])
}

/// Params to read a file page and its current version.
pub fn file_query(title: &str) -> Params {
    params([
        ("prop", "imageinfo"),
        ("titles", title),
        ("iiprop", "url|size|mime|timestamp"),
        ("curtimestamp", "1"),
    ])
}

/// Decode an API body, surfacing `{"error": {...}}` as [`WikiError::Api`].
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    if let Some(error) = value.get("error") {
        let info: ApiErrorInfo = serde_json::from_value(error.clone())?;
        return Err(WikiError::Api(info));
    }
    Ok(serde_json::from_value(value)?)
}

/// MediaWiki's timestamp format (`2024-05-01T10:00:00Z`).
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
