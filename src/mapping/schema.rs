//! Declarative per-type mapping tables.
//!
//! A [`Schema`] is built once per record type, with chained declarations,
//! and is read-only afterwards. Derived schemas start from a clone of their
//! base and only ever add entries.

use serde::Serialize;

/// Tag for every record type the walker can instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Link,
    PhotoUrl,
    Thumbnail,
    Author,
    User,
    RecentPhotos,
    Album,
    Search,
    Photo,
}

/// Where a record reads its scalar values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Child elements, recursively.
    Children,
    /// The element's own XML attributes (e.g. `<link rel href/>`).
    Attributes,
}

/// A nested-record mapping: qualified element name to slot and type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub qualified_name: &'static str,
    pub slot: &'static str,
    pub kind: RecordKind,
}

/// What to do with a child element, by qualified name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule<'a> {
    Flatten,
    HasOne(&'a Mapping),
    HasMany(&'a Mapping),
}

#[derive(Debug, Clone)]
pub struct Schema {
    mode: ParseMode,
    namespaces: Vec<&'static str>,
    attributes: Vec<&'static str>,
    has_one: Vec<Mapping>,
    has_many: Vec<Mapping>,
    flatten: Vec<&'static str>,
}

impl Schema {
    /// An empty schema for records populated from child elements.
    pub fn elements() -> Self {
        Self::with_mode(ParseMode::Children)
    }

    /// An empty schema for records populated from XML attributes.
    pub fn leaf() -> Self {
        Self::with_mode(ParseMode::Attributes)
    }

    fn with_mode(mode: ParseMode) -> Self {
        Self {
            mode,
            namespaces: Vec::new(),
            attributes: Vec::new(),
            has_one: Vec::new(),
            has_many: Vec::new(),
            flatten: Vec::new(),
        }
    }

    /// Starts a new schema from a copy of this one.
    pub fn derive(&self) -> Self {
        self.clone()
    }

    pub fn namespaces(mut self, names: &[&'static str]) -> Self {
        for &name in names {
            if !self.namespaces.contains(&name) {
                self.namespaces.push(name);
            }
        }
        self
    }

    pub fn attribute(mut self, name: &'static str) -> Self {
        assert!(
            !self.slot_taken(name),
            "attribute `{name}` collides with a nested slot"
        );
        if !self.attributes.contains(&name) {
            self.attributes.push(name);
        }
        self
    }

    pub fn attributes(self, names: &[&'static str]) -> Self {
        names.iter().fold(self, |schema, &name| schema.attribute(name))
    }

    /// # Panics
    ///
    /// If `qualified_name` already has a rule in this schema.
    pub fn has_one(mut self, qualified_name: &'static str, slot: &'static str, kind: RecordKind) -> Self {
        self.claim(qualified_name, slot);
        self.has_one.push(Mapping {
            qualified_name,
            slot,
            kind,
        });
        self
    }

    /// # Panics
    ///
    /// If `qualified_name` already has a rule in this schema.
    pub fn has_many(mut self, qualified_name: &'static str, slot: &'static str, kind: RecordKind) -> Self {
        self.claim(qualified_name, slot);
        self.has_many.push(Mapping {
            qualified_name,
            slot,
            kind,
        });
        self
    }

    /// # Panics
    ///
    /// If `qualified_name` already has a rule in this schema.
    pub fn flatten(mut self, qualified_name: &'static str) -> Self {
        assert!(
            self.rule(qualified_name).is_none(),
            "`{qualified_name}` is already mapped"
        );
        self.flatten.push(qualified_name);
        self
    }

    fn claim(&self, qualified_name: &str, slot: &str) {
        assert!(
            self.rule(qualified_name).is_none(),
            "`{qualified_name}` is already mapped"
        );
        assert!(
            !self.attributes.iter().any(|a| *a == slot),
            "slot `{slot}` collides with a scalar attribute"
        );
    }

    fn slot_taken(&self, name: &str) -> bool {
        self.has_one
            .iter()
            .chain(self.has_many.iter())
            .any(|m| m.slot == name)
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Elements without a namespace are always recognized.
    pub fn recognizes(&self, namespace: Option<&str>) -> bool {
        match namespace {
            None | Some("") => true,
            Some(ns) => self.namespaces.iter().any(|n| *n == ns),
        }
    }

    /// The structural rule for a qualified element name, if any.
    pub fn rule(&self, qualified_name: &str) -> Option<Rule<'_>> {
        if self.flatten.iter().any(|f| *f == qualified_name) {
            return Some(Rule::Flatten);
        }
        if let Some(m) = self.has_one.iter().find(|m| m.qualified_name == qualified_name) {
            return Some(Rule::HasOne(m));
        }
        self.has_many
            .iter()
            .find(|m| m.qualified_name == qualified_name)
            .map(Rule::HasMany)
    }

    /// The declared attribute name equal to `name`, if any.
    pub fn declared_attribute(&self, name: &str) -> Option<&'static str> {
        self.attributes.iter().copied().find(|a| *a == name)
    }

    pub fn attribute_names(&self) -> &[&'static str] {
        &self.attributes
    }
}
