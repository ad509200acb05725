//! HTTP(S) source.

use std::collections::BTreeMap;

use reqwest::blocking::{Client, Request, Response};

use super::{ByteStream, InputProvider, SourceKind};
use crate::config::HttpConfig;
use crate::error::Result;

/// Input provider for `http://` and `https://` URLs.
///
/// Issues one GET per `open` and streams the response body. Error statuses
/// fail the open; redirects follow the client default.
#[derive(Debug, Clone)]
pub struct HttpInput {
    url: String,
    headers: BTreeMap<String, String>,
    config: HttpConfig,
}

impl HttpInput {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            config: HttpConfig::default(),
        }
    }

    /// Add headers sent with the request. Later values replace earlier ones.
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_config(mut self, config: HttpConfig) -> Self {
        self.config = config;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Build a client carrying the configured user agent and timeout.
    pub fn client(&self) -> Result<Client> {
        let client = Client::builder()
            .user_agent(self.config.user_agent.as_str())
            .timeout(self.config.timeout())
            .build()?;
        Ok(client)
    }

    /// Build the GET request without sending it.
    pub fn request(&self, client: &Client) -> Result<Request> {
        let mut builder = client.get(&self.url);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        Ok(builder.build()?)
    }
}

impl InputProvider for HttpInput {
    fn id(&self) -> &str {
        &self.url
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Http
    }

    fn open(&self) -> Result<Box<dyn ByteStream>> {
        let client = self.client()?;
        let request = self.request(&client)?;
        let response = client.execute(request)?.error_for_status()?;
        tracing::debug!(
            url = %self.url,
            status = %response.status(),
            content_length = ?response.content_length(),
            "http response"
        );
        Ok(Box::new(response))
    }
}

impl ByteStream for Response {
    fn kind(&self) -> SourceKind {
        SourceKind::Http
    }
}
