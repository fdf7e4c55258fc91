//! Shared test helpers: an in-memory portal session.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures::{stream, StreamExt};

use crate::api::session::{ByteStream, Session};
use crate::error::{Error, Result};

/// In-memory [`Session`] serving canned pages, folder POSTs and files.
///
/// Unknown URLs answer with a transport error, like an unreachable host.
#[derive(Default)]
pub(crate) struct MockSession {
    pages: HashMap<String, String>,
    folders: HashMap<(String, String), String>,
    files: HashMap<String, Vec<u8>>,
    broken: HashSet<String>,
    open_delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl MockSession {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for a GET of `url` (query pairs appended as `?k=v&...`).
    pub(crate) fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    /// Serve `body` for a navigation POST to `action` opening `collection_id`.
    pub(crate) fn with_folder(mut self, action: &str, collection_id: &str, body: &str) -> Self {
        self.folders
            .insert((action.to_string(), collection_id.to_string()), body.to_string());
        self
    }

    /// Serve `body` for a POST to `url` without a collection id.
    pub(crate) fn with_post(self, url: &str, body: &str) -> Self {
        self.with_folder(url, "", body)
    }

    /// Serve `content` as a download.
    pub(crate) fn with_file(mut self, url: &str, content: &[u8]) -> Self {
        self.files.insert(url.to_string(), content.to_vec());
        self
    }

    /// Serve the first chunk of `content`, then fail mid-stream.
    pub(crate) fn with_broken_file(mut self, url: &str, content: &[u8]) -> Self {
        self.files.insert(url.to_string(), content.to_vec());
        self.broken.insert(url.to_string());
        self
    }

    /// Hold every download open for `delay` before returning its body.
    pub(crate) fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = Some(delay);
        self
    }

    /// Highest number of downloads that were being opened at the same time.
    pub(crate) fn peak_opens(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Requests seen so far, as `GET url`, `POST url collectionId` or `OPEN url`.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of downloads opened.
    pub(crate) fn opened(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with("OPEN "))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn with_query(url: &str, query: &[(&str, &str)]) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    format!("{}?{}", url, pairs.join("&"))
}

#[async_trait]
impl Session for MockSession {
    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let url = with_query(url, query);
        self.record(format!("GET {}", url));
        self.pages
            .get(&url)
            .cloned()
            .ok_or_else(|| Error::Transport(format!("connection refused: {}", url)))
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<String> {
        let collection_id = form
            .iter()
            .find(|(name, _)| *name == "collectionId")
            .map(|(_, value)| value.to_string())
            .unwrap_or_default();
        self.record(format!("POST {} {}", url, collection_id));
        self.folders
            .get(&(url.to_string(), collection_id))
            .cloned()
            .ok_or_else(|| Error::Transport(format!("connection refused: {}", url)))
    }

    async fn open(&self, url: &str) -> Result<ByteStream> {
        self.record(format!("OPEN {}", url));

        if let Some(delay) = self.open_delay {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        let content = self
            .files
            .get(url)
            .cloned()
            .ok_or_else(|| Error::Download(format!("HTTP 404 Not Found for {}", url)))?;

        let chunks: Vec<Vec<u8>> = content.chunks(4).map(<[u8]>::to_vec).collect();
        if self.broken.contains(url) {
            let first = chunks.into_iter().next().unwrap_or_default();
            let items = vec![Ok(first), Err(Error::Timeout(20))];
            return Ok(stream::iter(items).boxed());
        }

        Ok(stream::iter(chunks.into_iter().map(Ok)).boxed())
    }
}
