//! Decides which record type represents a whole document.
//!
//! Picasa marks every feed and entry with a `<category scheme term/>` pair
//! whose term ends in `#user`, `#album` or `#photo`. The first such marker
//! in document order belongs to the feed, the second to its first entry.

use crate::error::PicasaError;
use crate::mapping::{Element, Tree};
use crate::types::{Document, FeedKind};

/// Path of the cross-user search feed.
const ALL_USERS_PATH: &str = "/data/feed/api/all";

/// Category term suffix, decoded once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discriminator {
    User,
    Album,
    Photo,
    Other,
}

impl Discriminator {
    /// Decodes the part of `term` after its final `#`.
    pub fn from_term(term: Option<&str>) -> Self {
        let Some((_, suffix)) = term.and_then(|t| t.rsplit_once('#')) else {
            return Discriminator::Other;
        };
        match suffix {
            "user" => Discriminator::User,
            "album" => Discriminator::Album,
            "photo" => Discriminator::Photo,
            _ => Discriminator::Other,
        }
    }
}

/// The markers the decision is based on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markers {
    pub feed_term: Option<String>,
    pub entry_term: Option<String>,
    /// `href` of the first `rel="self"` atom link.
    pub self_href: Option<String>,
}

impl Markers {
    pub fn extract(root: &Element) -> Self {
        let mut terms = root
            .descendants()
            .filter(|e| e.attribute("scheme").is_some())
            .filter_map(|e| e.attribute("term"));
        let feed_term = terms.next().map(str::to_owned);
        let entry_term = terms.next().map(str::to_owned);

        let self_href = root
            .descendants()
            .find(|e| {
                e.attribute("rel") == Some("self")
                    && e.attribute("type") == Some("application/atom+xml")
            })
            .and_then(|e| e.attribute("href"))
            .map(str::to_owned);

        Markers {
            feed_term,
            entry_term,
            self_href,
        }
    }

    fn under_all_users(&self) -> bool {
        self.self_href
            .as_deref()
            .and_then(|href| url::Url::parse(href).ok())
            .is_some_and(|url| url.path().starts_with(ALL_USERS_PATH))
    }

    fn unknown(&self) -> PicasaError {
        PicasaError::UnknownFeedType {
            feed: self.feed_term.clone(),
            entry: self.entry_term.clone(),
        }
    }
}

/// Picks the record type for a document with the given markers.
pub fn decide(markers: &Markers) -> Result<FeedKind, PicasaError> {
    use Discriminator as D;

    let feed = D::from_term(markers.feed_term.as_deref());
    let entry = D::from_term(markers.entry_term.as_deref());

    let kind = match (feed, entry) {
        (D::User, D::Album) => FeedKind::User,
        (D::User, D::Photo) => FeedKind::RecentPhotos,
        (D::User, _) => FeedKind::Search,
        (D::Album, _) => FeedKind::Album,
        (D::Photo, D::Photo) => FeedKind::Search,
        (D::Photo, _) if markers.under_all_users() => FeedKind::Search,
        (D::Photo, _) => FeedKind::Photo,
        (D::Other, _) => return Err(markers.unknown()),
    };
    Ok(kind)
}

/// Reads `xml` and builds the record the resolver picks for it.
pub fn parse(xml: &[u8]) -> Result<Document, PicasaError> {
    let tree = Tree::read(xml);
    if let Some(err) = &tree.malformed {
        tracing::warn!(error = %err, "Malformed document, resolving from what was read");
    }
    let Some(root) = &tree.root else {
        return Err(PicasaError::UnknownFeedType {
            feed: None,
            entry: None,
        });
    };

    let markers = Markers::extract(root);
    let kind = decide(&markers)?;
    tracing::debug!(?kind, feed = ?markers.feed_term, entry = ?markers.entry_term, "Resolved feed type");
    Ok(Document::build(kind, root))
}
