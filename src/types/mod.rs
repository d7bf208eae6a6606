//! The entity graph: records built from Picasa feeds.

mod album;
mod atom;
mod header;
mod lineage;
mod photo;
pub mod registry;
mod user;

pub use album::{Album, Search};
pub use atom::{Author, Link};
pub use header::{Header, Paging};
pub use lineage::Lineage;
pub use photo::{Photo, PhotoUrl, Thumbnail};
pub use user::{Account, RecentPhotos, User};

use serde::Serialize;

use crate::error::PicasaError;
use crate::mapping::{walk, Element, RecordKind};
use crate::session::{Picasa, RequestOptions};

/// The concrete type of a whole document, as decided by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    User,
    RecentPhotos,
    Album,
    Search,
    Photo,
}

impl FeedKind {
    pub fn record_kind(self) -> RecordKind {
        match self {
            FeedKind::User => RecordKind::User,
            FeedKind::RecentPhotos => RecordKind::RecentPhotos,
            FeedKind::Album => RecordKind::Album,
            FeedKind::Search => RecordKind::Search,
            FeedKind::Photo => RecordKind::Photo,
        }
    }
}

/// A parsed top-level document.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Document {
    User(User),
    RecentPhotos(RecentPhotos),
    Album(Album),
    Search(Search),
    Photo(Photo),
}

impl Document {
    /// Builds the record for `kind` from the document's root element.
    pub fn build(kind: FeedKind, root: &Element) -> Document {
        match kind {
            FeedKind::User => Document::User(walk(root, None)),
            FeedKind::RecentPhotos => Document::RecentPhotos(walk(root, None)),
            FeedKind::Album => Document::Album(walk(root, None)),
            FeedKind::Search => Document::Search(walk(root, None)),
            FeedKind::Photo => Document::Photo(walk(root, None)),
        }
    }

    pub fn kind(&self) -> FeedKind {
        match self {
            Document::User(_) => FeedKind::User,
            Document::RecentPhotos(_) => FeedKind::RecentPhotos,
            Document::Album(_) => FeedKind::Album,
            Document::Search(_) => FeedKind::Search,
            Document::Photo(_) => FeedKind::Photo,
        }
    }

    pub fn as_resource(&self) -> &dyn Resource {
        match self {
            Document::User(r) => r,
            Document::RecentPhotos(r) => r,
            Document::Album(r) => r,
            Document::Search(r) => r,
            Document::Photo(r) => r,
        }
    }

    /// Photo entries of an album, search or recent-photos feed.
    pub fn into_photos(self) -> Option<Vec<Photo>> {
        match self {
            Document::Album(album) => Some(album.entries),
            Document::Search(search) => Some(search.into_album().entries),
            Document::RecentPhotos(recent) => Some(recent.entries),
            Document::User(_) | Document::Photo(_) => None,
        }
    }

    pub fn into_user(self) -> Option<User> {
        match self {
            Document::User(user) => Some(user),
            _ => None,
        }
    }

    pub fn into_album(self) -> Option<Album> {
        match self {
            Document::Album(album) => Some(album),
            Document::Search(search) => Some(search.into_album()),
            _ => None,
        }
    }
}

impl Resource for Document {
    fn header(&self) -> &Header {
        self.as_resource().header()
    }

    fn lineage(&self) -> &Lineage {
        self.as_resource().lineage()
    }
}

/// A nested record built by the walker for a has-one/has-many slot.
#[derive(Debug, Clone)]
pub enum Child {
    Link(Link),
    PhotoUrl(PhotoUrl),
    Thumbnail(Thumbnail),
    Author(Author),
    User(Box<User>),
    RecentPhotos(Box<RecentPhotos>),
    Album(Album),
    Search(Box<Search>),
    Photo(Photo),
}

impl Child {
    pub fn build(kind: RecordKind, element: &Element, parent: &Lineage) -> Child {
        let parent = Some(parent);
        match kind {
            RecordKind::Link => Child::Link(walk(element, parent)),
            RecordKind::PhotoUrl => Child::PhotoUrl(walk(element, parent)),
            RecordKind::Thumbnail => Child::Thumbnail(walk(element, parent)),
            RecordKind::Author => Child::Author(walk(element, parent)),
            RecordKind::User => Child::User(Box::new(walk(element, parent))),
            RecordKind::RecentPhotos => Child::RecentPhotos(Box::new(walk(element, parent))),
            RecordKind::Album => Child::Album(walk(element, parent)),
            RecordKind::Search => Child::Search(Box::new(walk(element, parent))),
            RecordKind::Photo => Child::Photo(walk(element, parent)),
        }
    }
}

/// Accessors shared by every document type.
pub trait Resource {
    fn header(&self) -> &Header;
    fn lineage(&self) -> &Lineage;

    fn id(&self) -> Option<&str> {
        self.header().id.as_deref()
    }

    fn title(&self) -> Option<&str> {
        self.header().title.as_deref()
    }

    /// First link with the given `rel`.
    fn link(&self, rel: &str) -> Option<&Link> {
        self.header().link(rel)
    }

    /// The session that fetched this record or one of its ancestors.
    fn session(&self) -> Option<Picasa> {
        self.lineage().session()
    }

    fn set_session(&self, session: &Picasa) {
        self.lineage().set_session(session);
    }
}

/// Lazy fetches through the record's session.
#[allow(async_fn_in_trait)]
pub trait Paginate: Resource {
    /// Fetches this record's own id url again.
    async fn load(&self, options: RequestOptions) -> Result<Option<Document>, PicasaError> {
        let session = self.session().ok_or(PicasaError::NoSession)?;
        let id = self.id().ok_or_else(|| PicasaError::invalid("id", ""))?;
        session.get_url(id, options).await
    }

    /// The next page, or `None` without fetching when there is none.
    async fn next(&self) -> Result<Option<Document>, PicasaError> {
        self.follow("next").await
    }

    /// The previous page, or `None` without fetching when there is none.
    async fn previous(&self) -> Result<Option<Document>, PicasaError> {
        self.follow("previous").await
    }

    async fn follow(&self, rel: &str) -> Result<Option<Document>, PicasaError> {
        let Some(href) = self.link(rel).and_then(|l| l.href.as_deref()) else {
            return Ok(None);
        };
        let session = self.session().ok_or(PicasaError::NoSession)?;
        session.get_url(href, RequestOptions::default()).await
    }
}

impl<T: Resource + ?Sized> Paginate for T {}
