//! Scripted transport and strategy for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use boostbot_core::StrategyKind;
use boostbot_fetch::{FetchError, PageResponse, SessionHandle, SessionStrategy, Transport};
use url::Url;

pub(crate) type Posted = Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>;

#[derive(Clone)]
enum Reply {
    Page(PageResponse),
    TimedOut,
}

pub(crate) fn page(status: u16, url: &str, body: &str) -> PageResponse {
    PageResponse::new(status, Url::parse(url).unwrap(), body)
}

/// Replies per URL are consumed in order; the last one repeats.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    gets: Arc<Mutex<HashMap<String, VecDeque<Reply>>>>,
    posts: Arc<Mutex<VecDeque<Reply>>>,
    cookies: Vec<String>,
    posted: Posted,
    closed: Arc<AtomicBool>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_get(self, url: &str, response: PageResponse) -> Self {
        self.push_get(url, Reply::Page(response));
        self
    }

    pub(crate) fn time_out(self, url: &str) -> Self {
        self.push_get(url, Reply::TimedOut);
        self
    }

    pub(crate) fn on_post(self, response: PageResponse) -> Self {
        self.posts.lock().unwrap().push_back(Reply::Page(response));
        self
    }

    pub(crate) fn with_cookie(mut self, name: &str) -> Self {
        self.cookies.push(name.to_string());
        self
    }

    pub(crate) fn posted(&self) -> Posted {
        Arc::clone(&self.posted)
    }

    pub(crate) fn closed(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }

    fn push_get(&self, url: &str, reply: Reply) {
        self.gets
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
    }

    fn next(queue: &mut VecDeque<Reply>) -> Option<Reply> {
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }

    fn resolve(reply: Option<Reply>, url: &str) -> Result<PageResponse, FetchError> {
        match reply {
            Some(Reply::Page(page)) => Ok(page),
            Some(Reply::TimedOut) => Err(FetchError::Timeout(30)),
            None => Err(FetchError::InvalidUrl(format!("unscripted request to {url}"))),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(&mut self, url: &str) -> Result<PageResponse, FetchError> {
        let reply = self.gets.lock().unwrap().get_mut(url).and_then(Self::next);
        Self::resolve(reply, url)
    }

    async fn submit_form(
        &mut self,
        url: &str,
        fields: &[(String, String)],
    ) -> Result<PageResponse, FetchError> {
        self.posted
            .lock()
            .unwrap()
            .push((url.to_string(), fields.to_vec()));
        let reply = Self::next(&mut self.posts.lock().unwrap());
        Self::resolve(reply, url)
    }

    async fn has_cookie(&mut self, _url: &str, name: &str) -> bool {
        self.cookies.iter().any(|cookie| cookie == name)
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Hands out clones of one scripted transport and counts sessions.
pub(crate) struct ScriptedStrategy {
    transport: ScriptedTransport,
    opened: Arc<AtomicU32>,
}

impl ScriptedStrategy {
    pub(crate) fn new(transport: ScriptedTransport) -> Self {
        Self {
            transport,
            opened: Arc::new(AtomicU32::new(0)),
        }
    }

    pub(crate) fn opened(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.opened)
    }
}

#[async_trait]
impl SessionStrategy for ScriptedStrategy {
    fn id(&self) -> &str {
        "scripted"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Plain
    }

    async fn open(&self) -> Result<SessionHandle, FetchError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(SessionHandle::new(
            self.kind(),
            Box::new(self.transport.clone()),
            Duration::from_secs(2),
        ))
    }
}
