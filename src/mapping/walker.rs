//! The schema-driven document walker.
//!
//! [`walk`] builds one record from one element: it visits the element's
//! children in document order, consults the record's [`Schema`] for each
//! one, and either recurses (flatten), builds a nested record
//! (has-one/has-many), or coerces the text into a scalar attribute.
//! Anything the schema does not know is dropped.

use super::names;
use super::schema::{ParseMode, Rule, Schema};
use super::tree::{Element, Tree};
use super::value::Value;
use crate::types::{Child, Lineage};

/// A record type the walker can populate.
pub trait Record: Default {
    /// The static mapping table for this type.
    fn schema() -> &'static Schema;

    /// Stores a coerced scalar under a declared attribute name.
    fn assign(&mut self, attribute: &str, value: Value);

    /// Stores a nested record under a has-one/has-many slot.
    fn attach(&mut self, slot: &str, child: Child) {
        let _ = child;
        tracing::trace!(slot, "Record has no nested slots, dropping child");
    }

    /// Receives the record's lineage once population is complete.
    fn adopt(&mut self, lineage: Lineage) {
        let _ = lineage;
    }
}

/// Parses raw XML into a record of type `R`.
///
/// Never fails: malformed input is logged and yields a record holding
/// whatever was read before the error. Input with no element at all yields
/// an empty record.
pub fn parse<R: Record>(xml: &[u8], parent: Option<&Lineage>) -> R {
    let tree = Tree::read(xml);
    if let Some(err) = &tree.malformed {
        tracing::warn!(error = %err, "Malformed document, keeping fields read so far");
    }
    match &tree.root {
        Some(root) => walk(root, parent),
        None => {
            let mut record = R::default();
            record.adopt(Lineage::new(parent));
            record
        }
    }
}

/// Builds a record of type `R` from `element`.
pub fn walk<R: Record>(element: &Element, parent: Option<&Lineage>) -> R {
    let schema = R::schema();
    let lineage = Lineage::new(parent);
    let mut record = R::default();

    match schema.mode() {
        ParseMode::Attributes => read_attributes(&mut record, schema, element),
        ParseMode::Children => read_children(&mut record, schema, element, &lineage),
    }

    record.adopt(lineage);
    record
}

fn read_children<R: Record>(record: &mut R, schema: &Schema, element: &Element, lineage: &Lineage) {
    // Text nodes are skipped by only visiting child elements
    for child in element.elements() {
        if !schema.recognizes(child.namespace()) {
            tracing::trace!(element = %child.qualified_name(), "Skipping unrecognized namespace");
            continue;
        }

        let qualified = child.qualified_name();
        match schema.rule(&qualified) {
            Some(Rule::Flatten) => read_children(record, schema, child, lineage),
            Some(Rule::HasOne(mapping)) | Some(Rule::HasMany(mapping)) => {
                let nested = Child::build(mapping.kind, child, lineage);
                record.attach(mapping.slot, nested);
            }
            None => match names::resolve(schema, child.namespace(), &child.name) {
                Some(attribute) => {
                    tracing::trace!(element = %qualified, attribute, "Assigning scalar");
                    record.assign(attribute, Value::coerce(&child.text()));
                }
                None => tracing::trace!(element = %qualified, "No attribute for element"),
            },
        }
    }
}

fn read_attributes<R: Record>(record: &mut R, schema: &Schema, element: &Element) {
    for attr in &element.attributes {
        if !schema.recognizes(attr.prefix.as_deref()) {
            continue;
        }
        match names::resolve(schema, attr.prefix.as_deref(), &attr.name) {
            Some(attribute) => record.assign(attribute, Value::coerce(&attr.value)),
            None => tracing::trace!(attribute = %attr.name, "No attribute for XML attribute"),
        }
    }
}
