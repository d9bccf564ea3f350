use derive_builder::Builder;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::{
    definitions::QueryResponse,
    errors::{Result, WikiError},
    mediawiki_api::{Params, WikiApi, decode, params},
};

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = "wikimate-rs/0.1 (MediaWiki page client)";
/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Custom struct as a wrapper for custom functions
#[derive(Debug, Clone)]
pub struct RustClient(pub ClientWithMiddleware);

/// Custom error to include all potential reqwest related errors.
#[derive(Debug, thiserror::Error)]
pub enum RustError {
    #[error("middleware error: {0}")]
    MiddleWare(#[from] reqwest_middleware::Error),
    #[error("reqwest error: {0}")]
    Underly(#[from] reqwest::Error),
}

impl RustClient {
    /// Create a new client that keeps session cookies between requests.
    ///
    /// # Arguments
    /// - user_agent -> Custom user agent to tell the server. Defaults to [`DEFAULT_USER_AGENT`]
    /// - timeout -> Per-request timeout in seconds.
    pub fn new(user_agent: Option<&str>, timeout: u64) -> Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .cookie_store(true)
            .timeout(Duration::from_secs(timeout))
            .build()?;
        Ok(Self(reqwest_middleware::ClientBuilder::new(client).build()))
    }

    pub fn get<U>(&self, url: U) -> reqwest_middleware::RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.0.get(url)
    }

    pub fn post<U>(&self, url: U) -> reqwest_middleware::RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.0.post(url)
    }
}

impl From<ClientWithMiddleware> for RustClient {
    fn from(value: ClientWithMiddleware) -> Self {
        Self(value)
    }
}

/// Settings for the HTTP transport.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct ClientConfig {
    /// Full url of the wiki's `api.php`.
    pub api_url: Url,
    #[builder(default = "DEFAULT_USER_AGENT.to_owned()")]
    pub user_agent: String,
    #[builder(default = "DEFAULT_TIMEOUT")]
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Shortcut for a config with only the api url set.
    pub fn for_api(api_url: &str) -> Result<Self> {
        ClientConfigBuilder::default()
            .api_url(Url::parse(api_url)?)
            .build()
            .map_err(|e| WikiError::Config(e.to_string()))
    }
}

/// [`WikiApi`] over HTTP.
///
/// Reads are `GET`s, writes are form `POST`s carrying a CSRF token fetched
/// right before the write. Logging in is left to whoever builds the
/// underlying client (the cookie store keeps an existing session).
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: RustClient,
    api_url: Url,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = RustClient::new(Some(&config.user_agent), config.timeout_secs)?;
        Ok(Self::with_client(client, config.api_url.clone()))
    }

    pub fn with_client(client: RustClient, api_url: Url) -> Self {
        Self { client, api_url }
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Build the api url for a read with the common format params.
    fn build_url(&self, params: &Params) -> Url {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("format", "json")
            .append_pair("formatversion", "2")
            .extend_pairs(params.iter())
            .finish();
        url
    }

    async fn read(&self, params: Params) -> Result<Value> {
        let url = self.build_url(&params);
        log::debug!("GET {}", url);
        Ok(self.client.get(url).send().await?.json::<Value>().await?)
    }

    async fn write(&self, action: &str, mut params: Params) -> Result<Value> {
        if !params.contains_key("token") {
            let token = self.csrf_token().await?;
            params.insert("token".into(), token);
        }
        params.insert("action".into(), action.into());
        params.insert("format".into(), "json".into());
        params.insert("formatversion".into(), "2".into());

        log::debug!(
            "POST {} action={} title={:?}",
            self.api_url,
            action,
            params.get("title").or(params.get("filename"))
        );
        Ok(self
            .client
            .post(self.api_url.clone())
            .form(&params)
            .send()
            .await?
            .json::<Value>()
            .await?)
    }

    async fn csrf_token(&self) -> Result<String> {
        let body = self.read(params([("meta", "tokens"), ("type", "csrf")])).await?;
        let response: QueryResponse = decode(body)?;
        response
            .query
            .and_then(|q| q.tokens)
            .map(|t| t.csrftoken)
            .ok_or_else(|| WikiError::Failed("no csrf token in response".into()))
    }
}

impl WikiApi for HttpApi {
    async fn query(&self, params: Params) -> Result<Value> {
        self.read(params).await
    }

    async fn edit(&self, params: Params) -> Result<Value> {
        self.write("edit", params).await
    }

    async fn delete(&self, params: Params) -> Result<Value> {
        self.write("delete", params).await
    }

    async fn upload(&self, params: Params) -> Result<Value> {
        self.write("upload", params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> HttpApi {
        let config = ClientConfig::for_api("https://wiki.example.org/w/api.php").unwrap();
        HttpApi::new(&config).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = ClientConfig::for_api("https://wiki.example.org/w/api.php").unwrap();
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT);
    }

    #[test]
    fn config_rejects_bad_url() {
        assert!(matches!(
            ClientConfig::for_api("not a url"),
            Err(WikiError::Url(_))
        ));
    }

    #[test]
    fn missing_api_url_is_a_config_error() {
        let err = ClientConfigBuilder::default().build().unwrap_err();
        assert!(err.to_string().contains("api_url"));
    }

    #[test]
    fn read_url_carries_format_and_params() {
        let url = api().build_url(&params([("titles", "Main Page"), ("prop", "info")]));
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs[0], ("action".into(), "query".into()));
        assert!(pairs.contains(&("format".into(), "json".into())));
        assert!(pairs.contains(&("formatversion".into(), "2".into())));
        assert!(pairs.contains(&("titles".into(), "Main Page".into())));
        assert_eq!(url.path(), "/w/api.php");
    }
}
