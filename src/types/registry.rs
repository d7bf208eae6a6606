//! Mapping tables for every record type, built once on first use.

use std::sync::OnceLock;

use super::{Account, Paging};
use crate::mapping::{RecordKind, Schema};

struct Registry {
    link: Schema,
    photo_url: Schema,
    thumbnail: Schema,
    author: Schema,
    user: Schema,
    recent_photos: Schema,
    album: Schema,
    search: Schema,
    photo: Schema,
}

/// The schema for `kind`.
pub fn schema(kind: RecordKind) -> &'static Schema {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    let registry = REGISTRY.get_or_init(Registry::build);
    match kind {
        RecordKind::Link => &registry.link,
        RecordKind::PhotoUrl => &registry.photo_url,
        RecordKind::Thumbnail => &registry.thumbnail,
        RecordKind::Author => &registry.author,
        RecordKind::User => &registry.user,
        RecordKind::RecentPhotos => &registry.recent_photos,
        RecordKind::Album => &registry.album,
        RecordKind::Search => &registry.search,
        RecordKind::Photo => &registry.photo,
    }
}

impl Registry {
    fn build() -> Self {
        let photo_url = Schema::leaf().attributes(&["url", "width", "height"]);
        let account = header()
            .attributes(Paging::ATTRIBUTES)
            .attributes(Account::ATTRIBUTES);
        let album = header()
            .attributes(Paging::ATTRIBUTES)
            .attributes(&[
                "published",
                "summary",
                "rights",
                "gphoto_id",
                "name",
                "location",
                "access",
                "numphotos",
                "allow_downloads",
            ])
            .has_many("entry", "entries", RecordKind::Photo);

        Registry {
            link: Schema::leaf().attributes(&["rel", "type", "href"]),
            thumbnail: photo_url.derive(),
            photo_url,
            author: Schema::elements().attributes(&["name", "uri", "email"]),
            user: account.derive().has_many("entry", "entries", RecordKind::Album),
            recent_photos: account.has_many("entry", "entries", RecordKind::Photo),
            search: album.derive(),
            album,
            photo: header().attributes(&[
                "published",
                "summary",
                "gphoto_id",
                "version",
                "position",
                "albumid",
                "width",
                "height",
                "size",
                "comment_count",
                "description",
                "keywords",
                "credit",
            ]),
        }
    }
}

/// Declarations shared by every document type.
fn header() -> Schema {
    Schema::elements()
        .namespaces(&["openSearch", "gphoto", "media"])
        .flatten("media:group")
        .attributes(&["id", "updated", "title"])
        .has_many("link", "links", RecordKind::Link)
        .has_one("media:content", "content", RecordKind::PhotoUrl)
        .has_many("media:thumbnail", "thumbnails", RecordKind::Thumbnail)
        .has_one("author", "author", RecordKind::Author)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{ParseMode, Rule};

    #[test]
    fn test_every_document_type_shares_the_header() {
        for kind in [
            RecordKind::User,
            RecordKind::RecentPhotos,
            RecordKind::Album,
            RecordKind::Search,
            RecordKind::Photo,
        ] {
            let schema = schema(kind);
            assert_eq!(schema.rule("media:group"), Some(Rule::Flatten), "{kind:?}");
            assert!(schema.declared_attribute("updated").is_some(), "{kind:?}");
            assert!(schema.recognizes(Some("openSearch")), "{kind:?}");
            assert!(!schema.recognizes(Some("exif")), "{kind:?}");
        }
    }

    #[test]
    fn test_entry_types_differ_between_user_and_recent_photos() {
        let entry_kind = |kind| match schema(kind).rule("entry") {
            Some(Rule::HasMany(m)) => Some(m.kind),
            _ => None,
        };
        assert_eq!(entry_kind(RecordKind::User), Some(RecordKind::Album));
        assert_eq!(entry_kind(RecordKind::RecentPhotos), Some(RecordKind::Photo));
        assert_eq!(entry_kind(RecordKind::Album), Some(RecordKind::Photo));
        assert_eq!(entry_kind(RecordKind::Search), Some(RecordKind::Photo));
        assert_eq!(entry_kind(RecordKind::Photo), None);
    }

    #[test]
    fn test_leaf_types_read_attributes() {
        assert_eq!(schema(RecordKind::Link).mode(), ParseMode::Attributes);
        assert_eq!(schema(RecordKind::Thumbnail).mode(), ParseMode::Attributes);
        assert_eq!(schema(RecordKind::Author).mode(), ParseMode::Children);
    }
}
