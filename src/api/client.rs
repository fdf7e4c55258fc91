//! Portal HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use futures::{stream, StreamExt};
use reqwest::{Client, Response};

use crate::api::session::{ByteStream, Session};
use crate::config::Config;
use crate::error::{Error, Result};

/// reqwest-backed [`Session`] with a shared cookie store.
pub struct PortalClient {
    client: Client,
    page_timeout: Duration,
    download_timeout: Duration,
}

impl PortalClient {
    /// Create a new client.
    pub fn new(user_agent: &str, page_timeout: Duration, download_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .cookie_store(true)
            .build()
            .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            page_timeout,
            download_timeout,
        })
    }

    /// Create a client from the account and timeout settings.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.account.user_agent,
            config.page_timeout(),
            config.download_timeout(),
        )
    }

    fn transport_error(&self, err: reqwest::Error, timeout: Duration) -> Error {
        if err.is_timeout() {
            Error::Timeout(timeout.as_secs())
        } else {
            Error::Transport(err.to_string())
        }
    }

    async fn read_page(&self, response: Response) -> Result<String> {
        let status = response.status();
        let url = response.url().to_string();
        tracing::debug!("Response status: {} ({})", status, url);

        if !status.is_success() {
            return Err(Error::Transport(format!("HTTP {} for {}", status, url)));
        }

        response
            .text()
            .await
            .map_err(|e| self.transport_error(e, self.page_timeout))
    }
}

#[async_trait]
impl Session for PortalClient {
    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .query(query)
            .timeout(self.page_timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e, self.page_timeout))?;

        self.read_page(response).await
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<String> {
        self.post_form_with_headers(url, form, &[]).await
    }

    async fn post_form_with_headers(
        &self,
        url: &str,
        form: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<String> {
        tracing::debug!("POST {}", url);

        let mut request = self.client.post(url).form(form).timeout(self.page_timeout);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e, self.page_timeout))?;

        self.read_page(response).await
    }

    async fn open(&self, url: &str) -> Result<ByteStream> {
        tracing::debug!("OPEN {}", url);

        let timeout = self.download_timeout;
        let response = tokio::time::timeout(timeout, self.client.get(url).send())
            .await
            .map_err(|_| Error::Timeout(timeout.as_secs()))?
            .map_err(|e| self.transport_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Download(format!("HTTP {} for {}", status, url)));
        }

        Ok(with_read_timeout(response, timeout))
    }
}

/// Turn a response body into a [`ByteStream`] whose every read is bounded by `timeout`.
fn with_read_timeout(response: Response, timeout: Duration) -> ByteStream {
    let body = response.bytes_stream().boxed();

    stream::unfold(Some(body), move |state| async move {
        let Some(mut body) = state else {
            return None;
        };
        match tokio::time::timeout(timeout, body.next()).await {
            Ok(Some(Ok(chunk))) => Some((Ok(chunk.to_vec()), Some(body))),
            Ok(Some(Err(e))) => Some((Err(Error::Transport(e.to_string())), None)),
            Ok(None) => None,
            Err(_) => Some((Err(Error::Timeout(timeout.as_secs())), None)),
        }
    })
    .boxed()
}
