// Scripted article source and helpers shared by the controller and session tests.
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ns_core::{decode, Article, ArticleSource, Error, Result};
use serde_json::json;
use tokio::sync::{mpsc, Semaphore};

use crate::state::SearchSnapshot;

#[derive(Clone)]
pub enum Reply {
    Body(String),
    TransportFailure(String),
}

/// Serves canned NewsAPI bodies keyed by (query, page). Unknown pages come
/// back empty. With a gate, every fetch waits for a permit before replying.
#[derive(Default)]
pub struct ScriptedSource {
    replies: Mutex<HashMap<(String, u32), Reply>>,
    calls: Mutex<Vec<(String, u32)>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let source = Self {
            gate: Some(gate.clone()),
            ..Self::default()
        };
        (source, gate)
    }

    pub fn page(self, query: &str, page: u32, articles: &[(&str, &str)]) -> Self {
        self.reply(query, page, Reply::Body(page_body(articles)))
    }

    pub fn failing(self, query: &str, page: u32, message: &str) -> Self {
        self.reply(query, page, Reply::TransportFailure(message.to_string()))
    }

    pub fn reply(self, query: &str, page: u32, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert((query.to_string(), page), reply);
        self
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ArticleSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch(&self, query: &str, page: u32, _page_size: u32) -> Result<Vec<Article>> {
        self.calls.lock().unwrap().push((query.to_string(), page));
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&(query.to_string(), page))
            .cloned();
        match reply {
            Some(Reply::Body(body)) => decode::decode(&body),
            Some(Reply::TransportFailure(message)) => Err(Error::Transport(message)),
            None => Ok(Vec::new()),
        }
    }
}

/// Builds a NewsAPI response body from (title, publishedAt) pairs.
pub fn page_body(articles: &[(&str, &str)]) -> String {
    let articles: Vec<_> = articles
        .iter()
        .map(|(title, date)| {
            json!({
                "source": {"id": null, "name": "Test"},
                "author": null,
                "title": title,
                "url": format!("https://example.com/{}", title.replace(' ', "-")),
                "publishedAt": date,
                "content": format!("{} body", title)
            })
        })
        .collect();
    json!({"status": "ok", "totalResults": articles.len(), "articles": articles}).to_string()
}

pub fn titles(articles: &[Article]) -> Vec<&str> {
    articles.iter().map(|a| a.title.as_str()).collect()
}

/// Waits for the first snapshot matching `pred`.
pub async fn wait_for(
    rx: &mut mpsc::UnboundedReceiver<SearchSnapshot>,
    pred: impl Fn(&SearchSnapshot) -> bool,
) -> SearchSnapshot {
    with_timeout(async {
        loop {
            let snapshot = rx.recv().await.expect("controller dropped");
            if pred(&snapshot) {
                return snapshot;
            }
        }
    })
    .await
}

/// Fails the test instead of hanging when `fut` does not finish.
pub async fn with_timeout<F: Future>(fut: F) -> F::Output {
    match tokio::time::timeout(Duration::from_secs(10), fut).await {
        Ok(output) => output,
        Err(_) => panic!("Test timed out after 10 seconds"),
    }
}
