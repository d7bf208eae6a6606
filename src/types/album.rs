use chrono::{DateTime, Utc};
use serde::Serialize;
use std::ops::{Deref, DerefMut};

use super::{registry, Child, Header, Lineage, Paging, Photo, Resource};
use crate::error::PicasaError;
use crate::mapping::{store, Record, RecordKind, Schema, Value};
use crate::session::RequestOptions;

/// An album feed, or an album entry inside a user feed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Album {
    #[serde(flatten)]
    pub header: Header,
    #[serde(flatten)]
    pub paging: Paging,
    pub published: Option<DateTime<Utc>>,
    pub summary: Option<String>,
    pub rights: Option<String>,
    pub gphoto_id: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub access: Option<String>,
    /// Number of photos in the album.
    pub numphotos: Option<u32>,
    pub allow_downloads: Option<bool>,
    pub entries: Vec<Photo>,
    #[serde(skip)]
    photos_requested: bool,
    #[serde(skip)]
    lineage: Lineage,
}

impl Album {
    pub fn public(&self) -> bool {
        self.rights.as_deref() == Some("public")
    }

    pub fn private(&self) -> bool {
        self.rights.as_deref() == Some("private")
    }

    /// The current page of photos.
    ///
    /// Album entries inside a user feed carry no photos. The first call on
    /// such an album fetches the album feed through the session and keeps
    /// its entries; later calls never fetch again, whatever the first one
    /// returned. That includes a first call that failed for lack of a
    /// session.
    pub async fn photos(&mut self, options: RequestOptions) -> Result<&[Photo], PicasaError> {
        if !self.entries.is_empty() || self.photos_requested {
            return Ok(&self.entries);
        }

        self.photos_requested = true;
        let session = self.session().ok_or(PicasaError::NoSession)?;
        let id = self
            .id()
            .ok_or_else(|| PicasaError::invalid("id", ""))?
            .to_owned();

        if let Some(document) = session.album(&id, options).await? {
            match document.into_photos() {
                Some(photos) => self.entries = photos,
                None => tracing::debug!(id = %id, "Album fetch returned a document without photos"),
            }
        }
        Ok(&self.entries)
    }
}

impl Record for Album {
    fn schema() -> &'static Schema {
        registry::schema(RecordKind::Album)
    }

    fn assign(&mut self, attribute: &str, value: Value) {
        let Some(value) = self.header.assign(attribute, value) else {
            return;
        };
        let Some(value) = self.paging.assign(attribute, value) else {
            return;
        };
        match attribute {
            "published" => store(&mut self.published, value),
            "summary" => store(&mut self.summary, value),
            "rights" => store(&mut self.rights, value),
            "gphoto_id" => store(&mut self.gphoto_id, value),
            "name" => store(&mut self.name, value),
            "location" => store(&mut self.location, value),
            "access" => store(&mut self.access, value),
            "numphotos" => store(&mut self.numphotos, value),
            "allow_downloads" => store(&mut self.allow_downloads, value),
            _ => tracing::trace!(attribute, "Album has no field for attribute"),
        }
    }

    fn attach(&mut self, slot: &str, child: Child) {
        match self.header.attach(slot, child) {
            None => {}
            Some(Child::Photo(photo)) if slot == "entries" => self.entries.push(photo),
            Some(_) => tracing::trace!(slot, "Album has no slot for child"),
        }
    }

    fn adopt(&mut self, lineage: Lineage) {
        self.lineage = lineage;
    }
}

impl Resource for Album {
    fn header(&self) -> &Header {
        &self.header
    }

    fn lineage(&self) -> &Lineage {
        &self.lineage
    }
}

/// Search results. Shaped and behaving like an [`Album`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Search(Album);

impl Search {
    pub fn into_album(self) -> Album {
        self.0
    }
}

impl Deref for Search {
    type Target = Album;

    fn deref(&self) -> &Album {
        &self.0
    }
}

impl DerefMut for Search {
    fn deref_mut(&mut self) -> &mut Album {
        &mut self.0
    }
}

impl Record for Search {
    fn schema() -> &'static Schema {
        registry::schema(RecordKind::Search)
    }

    fn assign(&mut self, attribute: &str, value: Value) {
        self.0.assign(attribute, value);
    }

    fn attach(&mut self, slot: &str, child: Child) {
        self.0.attach(slot, child);
    }

    fn adopt(&mut self, lineage: Lineage) {
        self.0.adopt(lineage);
    }
}

impl Resource for Search {
    fn header(&self) -> &Header {
        &self.0.header
    }

    fn lineage(&self) -> &Lineage {
        &self.0.lineage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::parse;

    #[test]
    fn test_rights() {
        let public: Album = parse(b"<feed><rights>public</rights></feed>", None);
        assert!(public.public());
        assert!(!public.private());

        let private: Album = parse(b"<feed><rights>private</rights></feed>", None);
        assert!(private.private());
        assert!(!private.public());

        let unset = Album::default();
        assert!(!unset.public() && !unset.private());
    }

    #[tokio::test]
    async fn test_photos_without_session_fails() {
        let mut album: Album = parse(b"<entry><id>http://x/album/1</id></entry>", None);
        let err = album.photos(RequestOptions::default()).await.unwrap_err();
        assert!(matches!(err, PicasaError::NoSession));
    }

    #[tokio::test]
    async fn test_photos_is_attempted_once_even_without_session() {
        let mut album: Album = parse(b"<entry><id>http://x/album/1</id></entry>", None);
        assert!(album.photos(RequestOptions::default()).await.is_err());

        let photos = album.photos(RequestOptions::default()).await.expect("no second attempt");
        assert!(photos.is_empty());
    }

    #[tokio::test]
    async fn test_photos_with_entries_does_not_need_session() {
        let mut album: Album = parse(
            b"<feed><id>1</id><entry><title>a.jpg</title></entry><entry><title>b.jpg</title></entry></feed>",
            None,
        );
        let photos = album.photos(RequestOptions::default()).await.expect("entries");
        assert_eq!(photos.len(), 2);
    }

    #[test]
    fn test_text_fields_keep_source_text() {
        let album: Album = parse(
            b"<entry><title>007</title><summary>2009-01-01T00:00:00Z</summary></entry>",
            None,
        );
        assert_eq!(album.title(), Some("007"));
        assert_eq!(album.summary.as_deref(), Some("2009-01-01T00:00:00Z"));
    }

    #[test]
    fn test_search_reads_like_album() {
        let search: Search = parse(
            b"<feed><title>puppies</title><entry><title>p.jpg</title></entry></feed>",
            None,
        );
        assert_eq!(search.header.title.as_deref(), Some("puppies"));
        assert_eq!(search.entries.len(), 1);
    }
}
