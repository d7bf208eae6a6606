use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use super::{registry, Child, Header, Lineage, Resource};
use crate::mapping::{store, Record, RecordKind, Schema, Value};

/// `media:content`: the full-size image.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhotoUrl {
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Record for PhotoUrl {
    fn schema() -> &'static Schema {
        registry::schema(RecordKind::PhotoUrl)
    }

    fn assign(&mut self, attribute: &str, value: Value) {
        match attribute {
            "url" => store(&mut self.url, value),
            "width" => store(&mut self.width, value),
            "height" => store(&mut self.height, value),
            _ => {}
        }
    }
}

/// `media:thumbnail`: a scaled image.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Thumbnail {
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

fn size_segment() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^s?(\d+)(?:-([cu]))?$").expect("size pattern is a valid regex"))
}

impl Thumbnail {
    /// Size code taken from the directory segment before the file name:
    /// `…/s72/x.jpg` is `72`, `…/s72-c/x.jpg` is `72c`.
    pub fn size_code(&self) -> Option<String> {
        let url = self.url.as_deref()?;
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let mut segments = path.rsplit('/');
        segments.next()?;
        let segment = segments.next().filter(|s| !s.is_empty())?;

        match size_segment().captures(segment) {
            Some(caps) => {
                let width = caps.get(1).map_or("", |m| m.as_str());
                let crop = caps.get(2).map_or("", |m| m.as_str());
                Some(format!("{width}{crop}"))
            }
            None => Some(segment.to_owned()),
        }
    }
}

impl Record for Thumbnail {
    fn schema() -> &'static Schema {
        registry::schema(RecordKind::Thumbnail)
    }

    fn assign(&mut self, attribute: &str, value: Value) {
        match attribute {
            "url" => store(&mut self.url, value),
            "width" => store(&mut self.width, value),
            "height" => store(&mut self.height, value),
            _ => {}
        }
    }
}

/// A single photo entry or photo feed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Photo {
    #[serde(flatten)]
    pub header: Header,
    pub published: Option<DateTime<Utc>>,
    pub summary: Option<String>,
    pub gphoto_id: Option<String>,
    pub version: Option<String>,
    pub position: Option<f64>,
    pub albumid: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub size: Option<u64>,
    pub comment_count: Option<u32>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub credit: Option<String>,
    #[serde(skip)]
    lineage: Lineage,
}

impl Photo {
    /// Url of the full image, or of the thumbnail with size code `size`.
    pub fn url(&self, size: Option<&str>) -> Option<&str> {
        match size {
            Some(size) => self.thumbnail(size)?.url.as_deref(),
            None => self.header.content.as_ref()?.url.as_deref(),
        }
    }

    pub fn thumbnail(&self, size: &str) -> Option<&Thumbnail> {
        self.header
            .thumbnails
            .iter()
            .find(|t| t.size_code().as_deref() == Some(size))
    }
}

impl Record for Photo {
    fn schema() -> &'static Schema {
        registry::schema(RecordKind::Photo)
    }

    fn assign(&mut self, attribute: &str, value: Value) {
        let Some(value) = self.header.assign(attribute, value) else {
            return;
        };
        match attribute {
            "published" => store(&mut self.published, value),
            "summary" => store(&mut self.summary, value),
            "gphoto_id" => store(&mut self.gphoto_id, value),
            "version" => store(&mut self.version, value),
            "position" => store(&mut self.position, value),
            "albumid" => store(&mut self.albumid, value),
            "width" => store(&mut self.width, value),
            "height" => store(&mut self.height, value),
            "size" => store(&mut self.size, value),
            "comment_count" => store(&mut self.comment_count, value),
            "description" => store(&mut self.description, value),
            "keywords" => store(&mut self.keywords, value),
            "credit" => store(&mut self.credit, value),
            _ => tracing::trace!(attribute, "Photo has no field for attribute"),
        }
    }

    fn attach(&mut self, slot: &str, child: Child) {
        if self.header.attach(slot, child).is_some() {
            tracing::trace!(slot, "Photo has no slot for child");
        }
    }

    fn adopt(&mut self, lineage: Lineage) {
        self.lineage = lineage;
    }
}

impl Resource for Photo {
    fn header(&self) -> &Header {
        &self.header
    }

    fn lineage(&self) -> &Lineage {
        &self.lineage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn thumb(url: &str) -> Thumbnail {
        Thumbnail {
            url: Some(url.to_string()),
            width: None,
            height: None,
        }
    }

    #[test]
    fn test_text_fields_keep_source_text() {
        let photo: Photo = crate::mapping::parse(
            b"<entry><title>1.50</title><description>0042</description></entry>",
            None,
        );
        assert_eq!(photo.title(), Some("1.50"));
        assert_eq!(photo.description.as_deref(), Some("0042"));
    }

    #[test]
    fn test_size_code() {
        assert_eq!(
            thumb("http://lh5.ggpht.com/liz/SKXR5BoXabI/AAAAAAAAAzs/tJQefyM4mFw/s72/invisible_bike.jpg")
                .size_code()
                .as_deref(),
            Some("72")
        );
        assert_eq!(
            thumb("http://lh5.ggpht.com/a/b/s144-c/bike.jpg").size_code().as_deref(),
            Some("144c")
        );
        assert_eq!(
            thumb("http://lh5.ggpht.com/a/b/s288-u/bike.jpg?imgmax=288").size_code().as_deref(),
            Some("288u")
        );
    }

    #[test]
    fn test_size_code_of_unsized_path_is_raw_segment() {
        assert_eq!(
            thumb("http://example.com/photos/bike.jpg").size_code().as_deref(),
            Some("photos")
        );
        assert_eq!(thumb("bike.jpg").size_code(), None);
        assert_eq!(Thumbnail::default().size_code(), None);
    }

    #[test]
    fn test_url_by_size() {
        let mut photo = Photo::default();
        photo.header.content = Some(PhotoUrl {
            url: Some("http://x/full.jpg".to_string()),
            width: Some(1600),
            height: Some(1200),
        });
        photo.header.thumbnails = vec![thumb("http://x/s72/a.jpg"), thumb("http://x/s144/a.jpg")];

        assert_eq!(photo.url(None), Some("http://x/full.jpg"));
        assert_eq!(photo.url(Some("144")), Some("http://x/s144/a.jpg"));
        assert_eq!(photo.url(Some("1600")), None);
    }
}
