// SPDX-License-Identifier: Apache-2.0

//! In-memory transports for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::time::Instant;

use super::transport::GraphqlTransport;
use crate::error::SyncError;

/// Replays a fixed list of responses and records every request.
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Value, SyncError>>>,
    requests: Mutex<Vec<(Instant, Value)>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<Value, SyncError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, body)| body.clone())
            .collect()
    }

    /// Time elapsed between consecutive requests.
    pub fn gaps(&self) -> Vec<Duration> {
        let requests = self.requests.lock().unwrap();
        requests
            .windows(2)
            .map(|pair| pair[1].0.duration_since(pair[0].0))
            .collect()
    }
}

#[async_trait]
impl GraphqlTransport for ScriptedTransport {
    async fn post(&self, body: &Value) -> Result<Value, SyncError> {
        self.requests
            .lock()
            .unwrap()
            .push((Instant::now(), body.clone()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request: {body}"))
    }
}

#[derive(Default)]
struct StoreState {
    blogs: Vec<(String, String)>,
    articles: Vec<(String, String, String)>,
    next_id: u64,
    log: Vec<String>,
    fail_next_article_create: Option<(SyncError, bool)>,
    article_user_errors: Vec<(String, Value)>,
}

/// A tiny simulated shop answering the blog and article documents.
///
/// Blog ids look like `gid://shopify/Blog/<n>`; article lookups honour the
/// `handle:` and `blog_id:` filters.
#[derive(Default)]
pub struct FakeShop {
    state: Mutex<StoreState>,
}

impl FakeShop {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState {
                next_id: 1000,
                ..StoreState::default()
            }),
        }
    }

    pub fn with_blog(self, handle: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = format!("gid://shopify/Blog/{}", state.next_id);
            state.next_id += 1;
            state.blogs.push((id, handle.to_string()));
        }
        self
    }

    pub fn with_article(self, blog_handle: &str, handle: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let blog_id = state
                .blogs
                .iter()
                .find(|(_, h)| h == blog_handle)
                .map(|(id, _)| id.clone())
                .expect("blog must exist");
            let id = format!("gid://shopify/Article/{}", state.next_id);
            state.next_id += 1;
            state.articles.push((id, blog_id, handle.to_string()));
        }
        self
    }

    /// Makes the next `articleCreate` fail with `error`; when `applied` is
    /// true the article is stored anyway, as if the response was lost.
    pub fn fail_next_article_create(&self, error: SyncError, applied: bool) {
        self.state.lock().unwrap().fail_next_article_create = Some((error, applied));
    }

    /// Makes `articleCreate` for `handle` answer with `userErrors`.
    pub fn reject_article(&self, handle: &str, user_errors: Value) {
        self.state
            .lock()
            .unwrap()
            .article_user_errors
            .push((handle.to_string(), user_errors));
    }

    /// Operation names in call order: `blogs`, `blogCreate`, `articles`, `articleCreate`.
    pub fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.log().iter().filter(|op| op.ends_with("Create")).count()
    }

    pub fn article_handles(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .articles
            .iter()
            .map(|(_, _, h)| h.clone())
            .collect()
    }
}

fn filter_value<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .split_whitespace()
        .find_map(|term| term.strip_prefix(key))
}

#[async_trait]
impl GraphqlTransport for FakeShop {
    async fn post(&self, body: &Value) -> Result<Value, SyncError> {
        let document = body["query"].as_str().unwrap_or_default();
        let variables = &body["variables"];
        let mut state = self.state.lock().unwrap();

        if document.contains("blogCreate(") {
            state.log.push("blogCreate".to_string());
            let input = &variables["blog"];
            let id = format!("gid://shopify/Blog/{}", state.next_id);
            state.next_id += 1;
            let handle = input["handle"].as_str().unwrap_or_default().to_string();
            state.blogs.push((id.clone(), handle.clone()));
            return Ok(json!({ "data": { "blogCreate": {
                "blog": {
                    "id": id,
                    "handle": handle,
                    "title": input["title"],
                    "templateSuffix": input["templateSuffix"],
                },
                "userErrors": []
            }}}));
        }

        if document.contains("articleCreate(") {
            state.log.push("articleCreate".to_string());
            let input = &variables["article"];
            let handle = input["handle"].as_str().unwrap_or_default().to_string();

            if let Some((_, errors)) = state
                .article_user_errors
                .iter()
                .find(|(h, _)| *h == handle)
            {
                return Ok(json!({ "data": { "articleCreate": {
                    "article": null,
                    "userErrors": errors,
                }}}));
            }

            let failure = state.fail_next_article_create.take();
            let id = format!("gid://shopify/Article/{}", state.next_id);
            state.next_id += 1;
            if failure.as_ref().is_none_or(|(_, applied)| *applied) {
                let blog_id = input["blogId"].as_str().unwrap_or_default().to_string();
                state.articles.push((id.clone(), blog_id, handle.clone()));
            }
            if let Some((error, _)) = failure {
                return Err(error);
            }
            return Ok(json!({ "data": { "articleCreate": {
                "article": { "id": id, "handle": handle, "title": input["title"] },
                "userErrors": []
            }}}));
        }

        let search = variables["query"].as_str().unwrap_or_default();

        if document.contains("blogs(") {
            state.log.push("blogs".to_string());
            let handle = filter_value(search, "handle:").unwrap_or_default();
            let nodes: Vec<Value> = state
                .blogs
                .iter()
                .filter(|(_, h)| h == handle)
                .map(|(id, h)| {
                    json!({ "id": id, "handle": h, "title": "Blog", "templateSuffix": null })
                })
                .collect();
            return Ok(json!({ "data": { "blogs": { "nodes": nodes } } }));
        }

        if document.contains("articles(") {
            state.log.push("articles".to_string());
            let handle = filter_value(search, "handle:").unwrap_or_default();
            let blog_id = filter_value(search, "blog_id:").unwrap_or_default();
            let nodes: Vec<Value> = state
                .articles
                .iter()
                .filter(|(_, b, h)| h == handle && b.rsplit('/').next() == Some(blog_id))
                .map(|(id, _, h)| json!({ "id": id, "handle": h }))
                .collect();
            return Ok(json!({ "data": { "articles": { "nodes": nodes } } }));
        }

        panic!("unexpected document: {document}");
    }
}
