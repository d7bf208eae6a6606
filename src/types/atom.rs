use serde::Serialize;

use super::registry;
use crate::mapping::{store, Record, RecordKind, Schema, Value};

/// `<link rel type href/>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Link {
    pub rel: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub href: Option<String>,
}

impl Record for Link {
    fn schema() -> &'static Schema {
        registry::schema(RecordKind::Link)
    }

    fn assign(&mut self, attribute: &str, value: Value) {
        match attribute {
            "rel" => store(&mut self.rel, value),
            "type" => store(&mut self.content_type, value),
            "href" => store(&mut self.href, value),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Author {
    pub name: Option<String>,
    pub uri: Option<String>,
    pub email: Option<String>,
}

impl Record for Author {
    fn schema() -> &'static Schema {
        registry::schema(RecordKind::Author)
    }

    fn assign(&mut self, attribute: &str, value: Value) {
        match attribute {
            "name" => store(&mut self.name, value),
            "uri" => store(&mut self.uri, value),
            "email" => store(&mut self.email, value),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_author_from_children() {
        let author: Author = parse(
            b"<author><name>Liz</name><uri>http://picasaweb.google.com/liz</uri></author>",
            None,
        );
        assert_eq!(
            author,
            Author {
                name: Some("Liz".to_string()),
                uri: Some("http://picasaweb.google.com/liz".to_string()),
                email: None,
            }
        );
    }

    #[test]
    fn test_link_ignores_children() {
        let link: Link = parse(br#"<link rel="next" href="http://x/2"><rel>bogus</rel></link>"#, None);
        assert_eq!(link.rel.as_deref(), Some("next"));
    }
}
