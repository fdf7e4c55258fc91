//! The authenticated-session capability used by discovery and downloads.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::Result;

/// Body of a download, delivered in chunks as they arrive.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>>>;

/// Cookie-carrying HTTP access to the portal.
///
/// Implementations share one cookie jar across all calls, so a session that
/// went through [`login`](crate::api::auth::login) stays authenticated.
#[async_trait]
pub trait Session: Send + Sync {
    /// GET a page and return its body as text.
    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String>;

    /// POST an url-encoded form and return the response body as text.
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<String>;

    /// POST an url-encoded form with extra request headers.
    ///
    /// Sessions without header support send the plain form.
    async fn post_form_with_headers(
        &self,
        url: &str,
        form: &[(&str, &str)],
        _headers: &[(&str, &str)],
    ) -> Result<String> {
        self.post_form(url, form).await
    }

    /// Open a download and return its body as a chunk stream.
    async fn open(&self, url: &str) -> Result<ByteStream>;
}
