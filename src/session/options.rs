use url::form_urlencoded;

use super::sizes::{validate_imgmax, validate_thumbsize};
use crate::error::PicasaError;
use crate::util::is_url;

const FEED_ROOT: &str = "/data/feed/api";

/// Options for a feed request.
///
/// Unset fields are left out of the query. `user_id` or `album_id` may be
/// given as full feed urls, in which case they are used like `url`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// `all` requests the cross-user feed. Defaults to `default`, the
    /// authenticated user.
    pub user_id: Option<String>,
    pub album_id: Option<String>,
    pub url: Option<String>,
    pub max_results: Option<u32>,
    pub start_index: Option<u32>,
    pub tag: Option<String>,
    pub q: Option<String>,
    pub kind: Option<String>,
    pub access: Option<String>,
    /// Comma-separated size codes, see [`super::sizes`].
    pub thumbsize: Option<String>,
    pub imgmax: Option<String>,
    pub bbox: Option<String>,
    /// Location name.
    pub l: Option<String>,
    /// Request photos rather than albums from a user feed.
    pub recent_photos: bool,
    /// Skip the request cache.
    pub reload: bool,
}

impl RequestOptions {
    pub fn user(user_id: impl Into<String>) -> Self {
        RequestOptions {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    pub fn album(album_id: impl Into<String>) -> Self {
        RequestOptions {
            album_id: Some(album_id.into()),
            ..Default::default()
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        RequestOptions {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Fills every field unset here from `base`.
    pub fn merged_over(self, base: RequestOptions) -> Self {
        RequestOptions {
            user_id: self.user_id.or(base.user_id),
            album_id: self.album_id.or(base.album_id),
            url: self.url.or(base.url),
            max_results: self.max_results.or(base.max_results),
            start_index: self.start_index.or(base.start_index),
            tag: self.tag.or(base.tag),
            q: self.q.or(base.q),
            kind: self.kind.or(base.kind),
            access: self.access.or(base.access),
            thumbsize: self.thumbsize.or(base.thumbsize),
            imgmax: self.imgmax.or(base.imgmax),
            bbox: self.bbox.or(base.bbox),
            l: self.l.or(base.l),
            recent_photos: self.recent_photos || base.recent_photos,
            reload: self.reload || base.reload,
        }
    }

    /// The request path with its query string. Also the cache key.
    ///
    /// # Errors
    ///
    /// [`PicasaError::InvalidParameter`] for a `thumbsize` or `imgmax` outside
    /// the accepted size codes.
    pub fn path(&self) -> Result<String, PicasaError> {
        if let Some(thumbsize) = &self.thumbsize {
            validate_thumbsize(thumbsize)?;
        }
        if let Some(imgmax) = &self.imgmax {
            validate_imgmax(imgmax)?;
        }

        let (path, mut query) = match self.source_url() {
            Some(url) => split_url(url),
            None => (self.feed_path(), Query::default()),
        };

        if self.recent_photos || self.album_id.is_some() {
            query.set("kind", "photo".to_string());
        }
        let pairs = [
            ("max-results", self.max_results.map(|n| n.to_string())),
            ("start-index", self.start_index.map(|n| n.to_string())),
            ("tag", self.tag.clone()),
            ("q", self.q.clone()),
            ("kind", self.kind.clone()),
            ("access", self.access.clone()),
            ("thumbsize", self.thumbsize.clone()),
            ("imgmax", self.imgmax.clone()),
            ("bbox", self.bbox.clone()),
            ("l", self.l.clone()),
        ];
        for (key, value) in pairs {
            if let Some(value) = value {
                query.set(key, value);
            }
        }

        if query.0.is_empty() {
            return Ok(path);
        }
        let encoded: Vec<String> = query
            .0
            .iter()
            .map(|(k, v)| format!("{k}={}", escape(v)))
            .collect();
        Ok(format!("{path}?{}", encoded.join("&")))
    }

    /// `url`, else `user_id` or `album_id` when given as a full url.
    fn source_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .or_else(|| self.user_id.as_deref().filter(|id| is_url(id)))
            .or_else(|| self.album_id.as_deref().filter(|id| is_url(id)))
    }

    fn feed_path(&self) -> String {
        let mut path = String::from(FEED_ROOT);
        match self.user_id.as_deref() {
            Some("all") => path.push_str("/all"),
            user => {
                path.push_str("/user/");
                path.push_str(&escape(user.unwrap_or("default")));
            }
        }
        if let Some(album_id) = &self.album_id {
            path.push_str("/albumid/");
            path.push_str(&escape(album_id));
        }
        path
    }
}

/// Query pairs in first-insertion order. Setting an existing key replaces
/// its value in place.
#[derive(Debug, Default)]
struct Query(Vec<(String, String)>);

impl Query {
    fn set(&mut self, key: &str, value: String) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.0.push((key.to_owned(), value)),
        }
    }
}

/// Splits a url into its path and decoded query pairs. Relative urls are
/// accepted.
fn split_url(url: &str) -> (String, Query) {
    let (path, query) = match url::Url::parse(url) {
        Ok(parsed) => (parsed.path().to_owned(), parsed.query().map(str::to_owned)),
        Err(_) => match url.split_once('?') {
            Some((path, query)) => (path.to_owned(), Some(query.to_owned())),
            None => (url.to_owned(), None),
        },
    };

    let mut pairs = Query::default();
    if let Some(query) = query {
        for (k, v) in form_urlencoded::parse(query.as_bytes()) {
            pairs.set(&k, v.into_owned());
        }
    }
    (path, pairs)
}

fn escape(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
