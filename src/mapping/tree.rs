//! A minimal element tree read with `quick-xml`.
//!
//! Namespaces are kept as the raw prefix (`gphoto`, `media`), which is what
//! schemas declare. Reading never fails outright: on malformed input the
//! elements opened so far are closed and returned with the error.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::MalformedDocument;

/// SEC-003: Maximum element nesting depth. Atom feeds from the API nest
/// at most six levels; anything far deeper is hostile or broken.
const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub prefix: Option<String>,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub prefix: Option<String>,
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    /// `prefix:name`, or just `name` without a prefix.
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Value of an unprefixed attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.prefix.is_none() && a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Concatenated text of all descendants, in document order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Direct child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// This element and all descendant elements, in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for node in &element.children {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => collect_text(e, out),
        }
    }
}

/// Pre-order iterator over an element subtree.
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        let children: Vec<&Element> = next.elements().collect();
        self.stack.extend(children.into_iter().rev());
        Some(next)
    }
}

/// The result of reading a document: the first root element, if any, and
/// the error that stopped reading early, if any.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    pub root: Option<Element>,
    pub malformed: Option<MalformedDocument>,
}

impl Tree {
    /// Reads `bytes` into an element tree.
    ///
    /// Declarations, processing instructions, comments and doctypes are
    /// skipped. Only the first top-level element is kept.
    ///
    /// # Security
    ///
    /// SEC-002: `quick-xml` never parses `<!ENTITY>` declarations. Unknown
    /// entity references fail to unescape and are kept as their literal
    /// source text rather than expanded.
    pub fn read(bytes: &[u8]) -> Tree {
        let mut reader = Reader::from_reader(bytes);
        reader.config_mut().trim_text(true);

        let mut builder = Builder::default();
        let mut buf = Vec::new();

        loop {
            if builder.root.is_some() {
                break;
            }
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    if builder.stack.len() >= MAX_DEPTH {
                        builder.malformed = Some(MalformedDocument {
                            position: reader.buffer_position() as u64,
                            message: format!("nesting depth exceeds maximum of {MAX_DEPTH} levels"),
                        });
                        break;
                    }
                    let element = open_element(&e, &reader);
                    builder.stack.push(element);
                }
                Ok(Event::Empty(e)) => {
                    let element = open_element(&e, &reader);
                    builder.close(element);
                }
                Ok(Event::End(_)) => {
                    if let Some(element) = builder.stack.pop() {
                        builder.close(element);
                    }
                }
                Ok(Event::Text(e)) => {
                    let text = match e.unescape() {
                        Ok(text) => text.into_owned(),
                        Err(err) => {
                            tracing::warn!(error = %err, "Keeping text with unrecognized entity as written");
                            String::from_utf8_lossy(&e).into_owned()
                        }
                    };
                    builder.text(text);
                }
                Ok(Event::CData(e)) => {
                    builder.text(String::from_utf8_lossy(&e).into_owned());
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    builder.malformed = Some(MalformedDocument {
                        position: reader.buffer_position() as u64,
                        message: e.to_string(),
                    });
                    break;
                }
                // Decl, PI, Comment, DocType
                Ok(_) => {}
            }
            buf.clear();
        }

        builder.finish()
    }
}

#[derive(Default)]
struct Builder {
    stack: Vec<Element>,
    root: Option<Element>,
    malformed: Option<MalformedDocument>,
}

impl Builder {
    fn close(&mut self, element: Element) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(Node::Element(element)),
            None => self.root = Some(element),
        }
    }

    fn text(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        // Text outside the root element is ignored
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(Node::Text(text));
        }
    }

    /// Closes any elements left open by truncated input.
    fn finish(mut self) -> Tree {
        while let Some(element) = self.stack.pop() {
            self.close(element);
        }
        Tree {
            root: self.root,
            malformed: self.malformed,
        }
    }
}

fn open_element(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Element {
    let name = e.name();
    let prefix = name
        .prefix()
        .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned());
    let local = String::from_utf8_lossy(name.local_name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attr_result in e.attributes() {
        let attr = match attr_result {
            Ok(attr) => attr,
            Err(err) => {
                tracing::warn!(error = %err, element = %local, "Skipping malformed attribute");
                continue;
            }
        };
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let value = match attr.decode_and_unescape_value(reader.decoder()) {
            Ok(v) => v.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        attributes.push(Attribute {
            prefix: attr
                .key
                .prefix()
                .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned()),
            name: String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned(),
            value,
        });
    }

    Element {
        prefix,
        name: local,
        attributes,
        children: Vec::new(),
    }
}
