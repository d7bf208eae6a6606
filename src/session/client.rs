use futures::StreamExt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use super::auth::{StaticToken, TokenSource};
use super::cache::{Body, RequestCache};
use super::options::RequestOptions;
use crate::config::Config;
use crate::error::PicasaError;
use crate::resolver;
use crate::types::{Document, Resource};

/// First retry delay; doubles on each further attempt.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Upper bound on a single backoff sleep.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Exponential backoff before retry number `retry` (zero-based), capped at
/// [`MAX_RETRY_DELAY`] however large `max_retries` is configured.
fn backoff_delay(retry: u32) -> Duration {
    2u32.checked_pow(retry)
        .and_then(|factor| RETRY_BASE_DELAY.checked_mul(factor))
        .map_or(MAX_RETRY_DELAY, |delay| delay.min(MAX_RETRY_DELAY))
}

/// A Picasa Web Albums session.
///
/// Cloning is cheap and clones share the request cache. Records fetched
/// through a session hold only a weak reference to it, so they never keep
/// it alive.
#[derive(Clone)]
pub struct Picasa {
    inner: Arc<Inner>,
}

pub(crate) struct Inner {
    http: reqwest::Client,
    host: String,
    timeout: Duration,
    max_response_bytes: usize,
    max_retries: u32,
    token: Option<Box<dyn TokenSource>>,
    cache: RequestCache,
}

impl Picasa {
    /// A session for `config`, authenticated when it carries a token.
    pub fn new(config: &Config) -> Result<Self, PicasaError> {
        let token = config
            .access_token
            .as_deref()
            .map(|t| Box::new(StaticToken::new(t)) as Box<dyn TokenSource>);
        Self::build(config, token)
    }

    /// A session that asks `source` for a token on every request.
    pub fn with_token_source(config: &Config, source: impl TokenSource + 'static) -> Result<Self, PicasaError> {
        Self::build(config, Some(Box::new(source)))
    }

    fn build(config: &Config, token: Option<Box<dyn TokenSource>>) -> Result<Self, PicasaError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("picasa-feed/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Picasa {
            inner: Arc::new(Inner {
                http,
                host: config.host.trim_end_matches('/').to_string(),
                timeout: config.timeout(),
                max_response_bytes: config.max_response_bytes,
                max_retries: config.max_retries,
                token,
                cache: RequestCache::new(config.cache_capacity),
            }),
        })
    }

    pub(crate) fn downgrade(&self) -> Weak<Inner> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn from_inner(inner: Arc<Inner>) -> Self {
        Picasa { inner }
    }

    /// Whether both handles refer to the same session.
    pub fn same_session(&self, other: &Picasa) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn host(&self) -> &str {
        &self.inner.host
    }

    /// The request path for `options`. See [`RequestOptions::path`].
    pub fn path(&self, options: &RequestOptions) -> Result<String, PicasaError> {
        options.path()
    }

    /// The user's albums. `None` requests the authenticated user.
    pub async fn user(&self, user_id: Option<&str>, options: RequestOptions) -> Result<Option<Document>, PicasaError> {
        let options = RequestOptions {
            user_id: user_id.map(str::to_owned),
            ..options
        };
        self.get(options).await
    }

    /// An album with its photos, by id or feed url.
    pub async fn album(&self, album_id: &str, options: RequestOptions) -> Result<Option<Document>, PicasaError> {
        let options = RequestOptions {
            album_id: Some(album_id.to_owned()),
            ..options
        };
        self.get(options).await
    }

    /// Photos matching `q` across all users, ten at a time unless `options`
    /// says otherwise.
    pub async fn search(&self, q: &str, options: RequestOptions) -> Result<Option<Document>, PicasaError> {
        let defaults = RequestOptions {
            max_results: Some(10),
            user_id: Some("all".to_string()),
            kind: Some("photo".to_string()),
            ..Default::default()
        };
        let options = RequestOptions {
            q: Some(q.to_owned()),
            ..options.merged_over(defaults)
        };
        self.get(options).await
    }

    /// Any supported feed; its type is decided from the response.
    pub async fn get_url(&self, url: &str, options: RequestOptions) -> Result<Option<Document>, PicasaError> {
        let options = RequestOptions {
            url: Some(url.to_owned()),
            ..options
        };
        self.get(options).await
    }

    /// The user's recently updated photos.
    pub async fn recent_photos(
        &self,
        user_id: Option<&str>,
        options: RequestOptions,
    ) -> Result<Option<Document>, PicasaError> {
        let options = RequestOptions {
            user_id: user_id.map(str::to_owned),
            recent_photos: true,
            ..options
        };
        self.get(options).await
    }

    /// The authenticated user's first album titled `title`, loaded with
    /// `options`.
    pub async fn album_by_title(&self, title: &str, options: RequestOptions) -> Result<Option<Document>, PicasaError> {
        use crate::types::Paginate;

        let Some(user) = self
            .user(None, RequestOptions::default())
            .await?
            .and_then(Document::into_user)
        else {
            return Ok(None);
        };
        match user.albums().iter().find(|a| a.title() == Some(title)) {
            Some(album) => album.load(options).await,
            None => Ok(None),
        }
    }

    /// Drops every cached response.
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    /// The raw body for `options`, bypassing the cache. `None` when the API
    /// answers with anything but 200 or 201.
    pub async fn xml(&self, options: &RequestOptions) -> Result<Option<String>, PicasaError> {
        let path = options.path()?;
        Ok(self.fetch(&path).await?.map(|body| body.to_string()))
    }

    /// Fetches through the cache and builds the resolved record.
    pub async fn get(&self, options: RequestOptions) -> Result<Option<Document>, PicasaError> {
        let path = options.path()?;
        if options.reload {
            self.inner.cache.evict(&path);
        }

        let slot = self.inner.cache.slot(&path);
        if slot.initialized() {
            tracing::debug!(path = %path, "Request cache hit");
        }
        let body = slot.get_or_try_init(|| self.fetch(&path)).await?.clone();

        let Some(xml) = body else {
            return Ok(None);
        };
        let document = resolver::parse(xml.as_bytes())?;
        document.set_session(self);
        Ok(Some(document))
    }

    async fn fetch(&self, path: &str) -> Result<Body, PicasaError> {
        let url = format!("{}{}", self.inner.host, path);
        let mut retry_count = 0;

        loop {
            tracing::debug!(path = %path, attempt = retry_count + 1, "Fetching feed");
            let request = self.authorize(self.inner.http.get(&url))?;
            let response = tokio::time::timeout(self.inner.timeout, request.send())
                .await
                .map_err(|_| PicasaError::Timeout)?
                .map_err(PicasaError::Network)?;

            let status = response.status();
            let retryable = status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if retryable && retry_count < self.inner.max_retries {
                let delay = backoff_delay(retry_count);
                tracing::warn!(
                    path = %path,
                    status = %status,
                    retry = retry_count,
                    delay_ms = delay.as_millis() as u64,
                    "Retryable response, backing off"
                );
                tokio::time::sleep(delay).await;
                retry_count += 1;
                continue;
            }

            if status != reqwest::StatusCode::OK && status != reqwest::StatusCode::CREATED {
                tracing::debug!(path = %path, status = %status, "No document for request");
                return Ok(None);
            }

            let body = tokio::time::timeout(self.inner.timeout, read_body(response, self.inner.max_response_bytes))
                .await
                .map_err(|_| PicasaError::Timeout)??;
            return Ok(Some(body));
        }
    }

    /// Adds `GData-Version: 2` and, when a token is available, the bearer
    /// authorization header.
    fn authorize(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, PicasaError> {
        let request = request.header("GData-Version", "2");
        let token = match &self.inner.token {
            Some(source) => source.access_token()?,
            None => None,
        };
        Ok(match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }
}

impl std::fmt::Debug for Picasa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Picasa")
            .field("host", &self.inner.host)
            .field("authenticated", &self.inner.token.is_some())
            .field("cached", &self.inner.cache.len())
            .finish()
    }
}

/// Reads the body, failing once it passes `limit` bytes. Invalid UTF-8 is
/// replaced rather than rejected.
async fn read_body(response: reqwest::Response, limit: usize) -> Result<Arc<str>, PicasaError> {
    if response.content_length().is_some_and(|len| len > limit as u64) {
        return Err(PicasaError::ResponseTooLarge(limit));
    }

    let mut stream = response.bytes_stream();
    let mut buffer = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if buffer.len().saturating_add(chunk.len()) > limit {
            return Err(PicasaError::ResponseTooLarge(limit));
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(Arc::from(String::from_utf8_lossy(&buffer)))
}
