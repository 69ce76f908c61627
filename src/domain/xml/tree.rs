//! Prefix-preserving XML element tree.
//!
//! The canonicalizer needs qualified names exactly as written, plus the
//! namespace declarations made on each element, neither of which survive in
//! namespace-resolved views. This tree keeps both while the `xml` reader
//! handles well-formedness, entity resolution, and attribute normalization.

use std::collections::BTreeMap;

use xml::reader::{EventReader, ParserConfig, XmlEvent};

use crate::infra::error::{SigningError, SigningResult};

/// A child of an element: a nested element or character data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// One element with its original prefix, resolved namespace, attributes,
/// the namespace declarations made on it, and its children in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    pub prefix: Option<String>,
    pub local_name: String,
    pub namespace_uri: Option<String>,
    pub attributes: Vec<XmlAttribute>,
    pub namespace_decls: Vec<NamespaceDecl>,
    pub children: Vec<XmlNode>,
}

/// A non-namespace attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub prefix: Option<String>,
    pub local_name: String,
    pub namespace_uri: Option<String>,
    pub value: String,
}

/// An `xmlns` or `xmlns:prefix` declaration made on an element.
/// `prefix == None` is the default-namespace declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    pub prefix: Option<String>,
    pub uri: String,
}

impl XmlElement {
    /// Qualified name as written in the source document.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.local_name),
            None => self.local_name.clone(),
        }
    }

    /// First element child, if any.
    #[must_use]
    pub fn first_child_element(&self) -> Option<&XmlElement> {
        self.children.iter().find_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }
}

impl XmlAttribute {
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.local_name),
            None => self.local_name.clone(),
        }
    }
}

/// Parse a document into its root element.
///
/// Comments are discarded, CDATA becomes character data, and whitespace
/// inside the document element is kept verbatim as text nodes.
pub fn parse_document(source: &str) -> SigningResult<XmlElement> {
    let config = ParserConfig::new()
        .trim_whitespace(false)
        .whitespace_to_characters(true)
        .cdata_to_characters(true)
        .ignore_comments(true)
        .coalesce_characters(true);
    let reader = EventReader::new_with_config(source.as_bytes(), config);

    let mut open_elements: Vec<XmlElement> = Vec::new();
    // Prefix -> URI bindings in scope, used to recover which declarations
    // were made on the current element.
    let mut scopes: Vec<BTreeMap<String, String>> = vec![initial_scope()];
    let mut root: Option<XmlElement> = None;

    for event in reader {
        let event =
            event.map_err(|e| SigningError::MalformedInternalXml(format!("XML parse error: {e}")))?;
        match event {
            XmlEvent::StartElement {
                name,
                attributes,
                namespace,
            } => {
                let parent_scope = scopes
                    .last()
                    .ok_or_else(|| malformed("namespace scope stack underflow"))?;

                let mut namespace_decls = Vec::new();
                let mut scope = parent_scope.clone();
                for (prefix, uri) in namespace.iter() {
                    if prefix == "xml" || prefix == "xmlns" {
                        continue;
                    }
                    if parent_scope.get(prefix).map(String::as_str) != Some(uri) {
                        namespace_decls.push(NamespaceDecl {
                            prefix: (!prefix.is_empty()).then(|| prefix.to_string()),
                            uri: uri.to_string(),
                        });
                    }
                    scope.insert(prefix.to_string(), uri.to_string());
                }
                scopes.push(scope);

                open_elements.push(XmlElement {
                    prefix: name.prefix,
                    local_name: name.local_name,
                    namespace_uri: name.namespace,
                    attributes: attributes
                        .into_iter()
                        .map(|attribute| XmlAttribute {
                            prefix: attribute.name.prefix,
                            local_name: attribute.name.local_name,
                            namespace_uri: attribute.name.namespace,
                            value: attribute.value,
                        })
                        .collect(),
                    namespace_decls,
                    children: Vec::new(),
                });
            }
            XmlEvent::EndElement { .. } => {
                scopes.pop();
                let element = open_elements
                    .pop()
                    .ok_or_else(|| malformed("unbalanced end tag"))?;
                match open_elements.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Element(element)),
                    None => root = Some(element),
                }
            }
            XmlEvent::Characters(text) => {
                // Character data outside the document element is not
                // well-formed XML; the reader rejects it before we get here.
                if let Some(parent) = open_elements.last_mut() {
                    parent.children.push(XmlNode::Text(text));
                }
            }
            _ => {}
        }
    }

    root.ok_or_else(|| malformed("document has no root element"))
}

fn initial_scope() -> BTreeMap<String, String> {
    // The no-prefix binding starts out empty; xml/xmlns are filtered above.
    let mut scope = BTreeMap::new();
    scope.insert(String::new(), String::new());
    scope
}

fn malformed(detail: &str) -> SigningError {
    SigningError::MalformedInternalXml(detail.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prefixes_and_namespaces() {
        let root = parse_document(
            r#"<ds:Signature xmlns:ds="http://www.w3.org/2000/09/xmldsig#"><ds:SignedInfo/></ds:Signature>"#,
        )
        .unwrap();

        assert_eq!(root.prefix.as_deref(), Some("ds"));
        assert_eq!(root.local_name, "Signature");
        assert_eq!(
            root.namespace_uri.as_deref(),
            Some("http://www.w3.org/2000/09/xmldsig#")
        );
        assert_eq!(root.namespace_decls.len(), 1);
        assert_eq!(root.namespace_decls[0].prefix.as_deref(), Some("ds"));
        assert_eq!(root.qualified_name(), "ds:Signature");

        let child = root.first_child_element().unwrap();
        assert_eq!(child.local_name, "SignedInfo");
        // Inherited binding, not re-declared.
        assert!(child.namespace_decls.is_empty());
    }

    #[test]
    fn keeps_whitespace_text_nodes() {
        let root = parse_document("<a>\n<b></b>\n</a>").unwrap();
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.children[0], XmlNode::Text("\n".to_string()));
        assert_eq!(root.children[2], XmlNode::Text("\n".to_string()));
    }

    #[test]
    fn default_namespace_declaration_recorded() {
        let root = parse_document(r#"<e xmlns="urn:example"><i/></e>"#).unwrap();
        assert_eq!(
            root.namespace_decls,
            vec![NamespaceDecl {
                prefix: None,
                uri: "urn:example".to_string()
            }]
        );
        let inner = root.first_child_element().unwrap();
        assert_eq!(inner.namespace_uri.as_deref(), Some("urn:example"));
        assert!(inner.namespace_decls.is_empty());
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_document("<a><b></a>").is_err());
        assert!(parse_document("not xml").is_err());
    }
}
