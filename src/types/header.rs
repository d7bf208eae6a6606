use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Author, Child, Link, PhotoUrl, Thumbnail};
use crate::mapping::{store, Value};

/// Fields every document type carries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Header {
    pub id: Option<String>,
    pub title: Option<String>,
    pub updated: Option<DateTime<Utc>>,
    pub links: Vec<Link>,
    /// `media:content`
    pub content: Option<PhotoUrl>,
    /// `media:thumbnail`, in document order.
    pub thumbnails: Vec<Thumbnail>,
    pub author: Option<Author>,
}

impl Header {
    /// Stores `value` if `attribute` is a header field, otherwise hands it back.
    pub(crate) fn assign(&mut self, attribute: &str, value: Value) -> Option<Value> {
        match attribute {
            "id" => store(&mut self.id, value),
            "title" => store(&mut self.title, value),
            "updated" => store(&mut self.updated, value),
            _ => return Some(value),
        }
        None
    }

    /// Stores `child` if `slot` is a header slot, otherwise hands it back.
    pub(crate) fn attach(&mut self, slot: &str, child: Child) -> Option<Child> {
        match (slot, child) {
            ("links", Child::Link(link)) => self.links.push(link),
            ("content", Child::PhotoUrl(url)) => self.content = Some(url),
            ("thumbnails", Child::Thumbnail(thumb)) => self.thumbnails.push(thumb),
            ("author", Child::Author(author)) => self.author = Some(author),
            (_, child) => return Some(child),
        }
        None
    }

    /// First link whose `rel` equals `rel`.
    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.rel.as_deref() == Some(rel))
    }
}

/// OpenSearch paging fields of a feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Paging {
    pub total_results: Option<u32>,
    pub start_index: Option<u32>,
    pub items_per_page: Option<u32>,
}

impl Paging {
    pub(crate) const ATTRIBUTES: &'static [&'static str] =
        &["total_results", "start_index", "items_per_page"];

    pub(crate) fn assign(&mut self, attribute: &str, value: Value) -> Option<Value> {
        match attribute {
            "total_results" => store(&mut self.total_results, value),
            "start_index" => store(&mut self.start_index, value),
            "items_per_page" => store(&mut self.items_per_page, value),
            _ => return Some(value),
        }
        None
    }
}
