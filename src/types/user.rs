use serde::Serialize;

use super::{registry, Album, Child, Header, Lineage, Paging, Photo, Resource};
use crate::mapping::{store, Record, RecordKind, Schema, Value};

/// Account fields shared by [`User`] and [`RecentPhotos`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct Account {
    /// Avatar url.
    pub thumbnail: Option<String>,
    pub user: Option<String>,
    pub nickname: Option<String>,
}

impl Account {
    pub(crate) const ATTRIBUTES: &'static [&'static str] = &["thumbnail", "user", "nickname"];

    fn assign(&mut self, attribute: &str, value: Value) -> Option<Value> {
        match attribute {
            "thumbnail" => store(&mut self.thumbnail, value),
            "user" => store(&mut self.user, value),
            "nickname" => store(&mut self.nickname, value),
            _ => return Some(value),
        }
        None
    }
}

/// A user feed: one page of the user's albums.
#[derive(Debug, Clone, Default, Serialize)]
pub struct User {
    #[serde(flatten)]
    pub header: Header,
    #[serde(flatten)]
    pub paging: Paging,
    #[serde(flatten)]
    pub account: Account,
    pub entries: Vec<Album>,
    #[serde(skip)]
    lineage: Lineage,
}

impl User {
    pub fn albums(&self) -> &[Album] {
        &self.entries
    }

    pub fn into_albums(self) -> Vec<Album> {
        self.entries
    }
}

/// A user feed requested with `kind=photo`: the user's recent photos.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecentPhotos {
    #[serde(flatten)]
    pub header: Header,
    #[serde(flatten)]
    pub paging: Paging,
    #[serde(flatten)]
    pub account: Account,
    pub entries: Vec<Photo>,
    #[serde(skip)]
    lineage: Lineage,
}

impl RecentPhotos {
    pub fn photos(&self) -> &[Photo] {
        &self.entries
    }
}

fn assign_account(
    header: &mut Header,
    paging: &mut Paging,
    account: &mut Account,
    attribute: &str,
    value: Value,
) {
    let leftover = header
        .assign(attribute, value)
        .and_then(|v| paging.assign(attribute, v))
        .and_then(|v| account.assign(attribute, v));
    if leftover.is_some() {
        tracing::trace!(attribute, "User feed has no field for attribute");
    }
}

impl Record for User {
    fn schema() -> &'static Schema {
        registry::schema(RecordKind::User)
    }

    fn assign(&mut self, attribute: &str, value: Value) {
        assign_account(&mut self.header, &mut self.paging, &mut self.account, attribute, value);
    }

    fn attach(&mut self, slot: &str, child: Child) {
        match self.header.attach(slot, child) {
            None => {}
            Some(Child::Album(album)) if slot == "entries" => self.entries.push(album),
            Some(_) => tracing::trace!(slot, "User has no slot for child"),
        }
    }

    fn adopt(&mut self, lineage: Lineage) {
        self.lineage = lineage;
    }
}

impl Record for RecentPhotos {
    fn schema() -> &'static Schema {
        registry::schema(RecordKind::RecentPhotos)
    }

    fn assign(&mut self, attribute: &str, value: Value) {
        assign_account(&mut self.header, &mut self.paging, &mut self.account, attribute, value);
    }

    fn attach(&mut self, slot: &str, child: Child) {
        match self.header.attach(slot, child) {
            None => {}
            Some(Child::Photo(photo)) if slot == "entries" => self.entries.push(photo),
            Some(_) => tracing::trace!(slot, "RecentPhotos has no slot for child"),
        }
    }

    fn adopt(&mut self, lineage: Lineage) {
        self.lineage = lineage;
    }
}

impl Resource for User {
    fn header(&self) -> &Header {
        &self.header
    }

    fn lineage(&self) -> &Lineage {
        &self.lineage
    }
}

impl Resource for RecentPhotos {
    fn header(&self) -> &Header {
        &self.header
    }

    fn lineage(&self) -> &Lineage {
        &self.lineage
    }
}
