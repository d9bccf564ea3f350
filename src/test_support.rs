//! In-memory `WikiApi` for the model tests.

use serde_json::{Value, json};
use std::{collections::VecDeque, sync::Mutex};

use crate::{
    errors::{Result, WikiError},
    mediawiki_api::{Params, WikiApi},
};

/// Replays canned responses in order and records every call.
#[derive(Debug, Default)]
pub struct MockApi {
    responses: Mutex<VecDeque<Result<Value>>>,
    calls: Mutex<Vec<(&'static str, Params)>>,
}

impl MockApi {
    pub fn new<I: IntoIterator<Item = Value>>(responses: I) -> Self {
        let api = Self::default();
        for response in responses {
            api.push(response);
        }
        api
    }

    pub fn push(&self, response: Value) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_err(&self, error: WikiError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<(&'static str, Params)> {
        self.calls.lock().unwrap().clone()
    }

    /// Params of the last call made with `action`.
    pub fn last(&self, action: &str) -> Option<Params> {
        self.calls()
            .into_iter()
            .rev()
            .find(|(a, _)| *a == action)
            .map(|(_, p)| p)
    }

    fn respond(&self, action: &'static str, params: Params) -> Result<Value> {
        self.calls.lock().unwrap().push((action, params));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(WikiError::Failed(format!("no canned response for {}", action))))
    }
}

impl WikiApi for MockApi {
    async fn query(&self, params: Params) -> Result<Value> {
        self.respond("query", params)
    }

    async fn edit(&self, params: Params) -> Result<Value> {
        self.respond("edit", params)
    }

    async fn delete(&self, params: Params) -> Result<Value> {
        self.respond("delete", params)
    }

    async fn upload(&self, params: Params) -> Result<Value> {
        self.respond("upload", params)
    }
}

pub fn page_body(title: &str, content: &str, now: &str) -> Value {
    json!({
        "batchcomplete": true,
        "curtimestamp": now,
        "query": {"pages": [{
            "pageid": 7,
            "ns": 0,
            "title": title,
            "touched": now,
            "revisions": [{
                "revid": 70,
                "timestamp": now,
                "slots": {"main": {"contentmodel": "wikitext", "content": content}}
            }]
        }]}
    })
}

pub fn missing_body(title: &str, now: &str) -> Value {
    json!({
        "curtimestamp": now,
        "query": {"pages": [{"ns": 0, "title": title, "missing": true}]}
    })
}

pub fn invalid_body(title: &str) -> Value {
    json!({
        "query": {"pages": [{
            "title": title,
            "invalidreason": "The requested page title contains invalid characters",
            "invalid": true
        }]}
    })
}

pub fn edit_success(title: &str, newtimestamp: &str) -> Value {
    json!({
        "edit": {"result": "Success", "pageid": 7, "title": title, "newtimestamp": newtimestamp}
    })
}

pub fn api_error(code: &str, info: &str) -> Value {
    json!({"error": {"code": code, "info": info}})
}
