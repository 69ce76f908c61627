//! Exclusive XML Canonicalization 1.0, omitting comments.
//!
//! Turns an element subtree into the deterministic octet sequence that gets
//! digested and signed. A Tizen device recomputes this transform on its own
//! parser's view of the document, so the output must not depend on attribute
//! order, namespace declaration placement, or line-ending conventions of the
//! source.
//!
//! Only the pieces the widget-digsig profile exercises are implemented:
//! element and text nodes, the `InclusiveNamespaces` prefix list, and a
//! caller-supplied fallback map for prefixes whose namespace URI the parser
//! did not attach. Comment-preserving mode and document-level nodes are not.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::domain::xml::tree::{XmlAttribute, XmlElement, XmlNode};

/// Canonicalization options.
#[derive(Debug, Clone, Default)]
pub struct C14nOptions {
    /// Prefixes to force-declare (the `InclusiveNamespaces` `PrefixList`).
    pub inclusive_namespace_prefixes: HashSet<String>,
    /// Default namespace in effect from the enclosing context.
    pub default_namespace: String,
    /// Fallback prefix -> namespace URI map, consulted when an element's own
    /// `namespace_uri` is missing but its prefix is known.
    pub default_namespace_for_prefix: HashMap<String, String>,
}

/// Per-element canonicalization state. Each recursion works on its own copy
/// so child declarations never leak into sibling output.
#[derive(Debug, Clone, Default)]
struct C14nScope {
    prefixes_in_scope: BTreeSet<String>,
    default_namespace: String,
}

/// Canonicalize an element subtree.
#[must_use]
pub fn canonicalize(element: &XmlElement, options: &C14nOptions) -> String {
    let scope = C14nScope {
        prefixes_in_scope: BTreeSet::new(),
        default_namespace: options.default_namespace.clone(),
    };
    let mut output = String::new();
    canonicalize_element(element, scope, options, &mut output);
    output
}

fn canonicalize_element(
    element: &XmlElement,
    mut scope: C14nScope,
    options: &C14nOptions,
    output: &mut String,
) {
    let qualified_name = element.qualified_name();
    output.push('<');
    output.push_str(&qualified_name);

    // Namespace axis. The default declaration is written immediately, ahead
    // of the prefixed declarations, which are collected and sorted by prefix.
    let mut declarations: Vec<(String, String)> = Vec::new();

    match &element.prefix {
        Some(prefix) => {
            if !scope.prefixes_in_scope.contains(prefix) {
                let uri = element
                    .namespace_uri
                    .clone()
                    .or_else(|| options.default_namespace_for_prefix.get(prefix).cloned())
                    .unwrap_or_default();
                declarations.push((prefix.clone(), uri));
                scope.prefixes_in_scope.insert(prefix.clone());
            }
        }
        None => {
            let uri = element.namespace_uri.clone().unwrap_or_default();
            if uri != scope.default_namespace {
                output.push_str(" xmlns=\"");
                output.push_str(&escape_attribute_value(&uri));
                output.push('"');
                scope.default_namespace = uri;
            }
        }
    }

    // Declarations pulled in by the InclusiveNamespaces prefix list.
    for declaration in &element.namespace_decls {
        if let Some(prefix) = &declaration.prefix {
            if options.inclusive_namespace_prefixes.contains(prefix)
                && !scope.prefixes_in_scope.contains(prefix)
            {
                declarations.push((prefix.clone(), declaration.uri.clone()));
                scope.prefixes_in_scope.insert(prefix.clone());
            }
        }
    }

    // Prefixed attributes force their prefix into scope.
    for attribute in &element.attributes {
        if let Some(prefix) = &attribute.prefix {
            if prefix != "xmlns"
                && prefix != "xml"
                && !scope.prefixes_in_scope.contains(prefix)
            {
                declarations.push((
                    prefix.clone(),
                    attribute.namespace_uri.clone().unwrap_or_default(),
                ));
                scope.prefixes_in_scope.insert(prefix.clone());
            }
        }
    }

    declarations.sort_by(|a, b| a.0.cmp(&b.0));
    for (prefix, uri) in &declarations {
        output.push_str(" xmlns:");
        output.push_str(prefix);
        output.push_str("=\"");
        output.push_str(&escape_attribute_value(uri));
        output.push('"');
    }

    // Attribute axis: no-namespace attributes first, then by (uri, local name).
    let mut attributes: Vec<&XmlAttribute> = element
        .attributes
        .iter()
        .filter(|attribute| !is_namespace_declaration(attribute))
        .collect();
    attributes.sort_by(|a, b| attribute_order(a, b));
    for attribute in attributes {
        output.push(' ');
        output.push_str(&attribute.qualified_name());
        output.push_str("=\"");
        output.push_str(&escape_attribute_value(&attribute.value));
        output.push('"');
    }

    output.push('>');

    for child in &element.children {
        match child {
            XmlNode::Element(child_element) => {
                canonicalize_element(child_element, scope.clone(), options, output);
            }
            XmlNode::Text(text) => output.push_str(&escape_text(text)),
        }
    }

    output.push_str("</");
    output.push_str(&qualified_name);
    output.push('>');
}

fn is_namespace_declaration(attribute: &XmlAttribute) -> bool {
    match &attribute.prefix {
        Some(prefix) => prefix == "xmlns",
        None => attribute.local_name == "xmlns",
    }
}

fn attribute_order(a: &XmlAttribute, b: &XmlAttribute) -> Ordering {
    match (&a.namespace_uri, &b.namespace_uri) {
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (a_uri, b_uri) => {
            let a_key = (a_uri.as_deref().unwrap_or(""), a.local_name.as_str());
            let b_key = (b_uri.as_deref().unwrap_or(""), b.local_name.as_str());
            a_key.cmp(&b_key)
        }
    }
}

/// `\r\n` and lone `\r` become `\n` before any escaping.
fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn escape_text(text: &str) -> String {
    let normalized = normalize_line_endings(text);
    let mut escaped = String::with_capacity(normalized.len());
    for character in normalized.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\r' => escaped.push_str("&#xD;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn escape_attribute_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '"' => escaped.push_str("&quot;"),
            '\r' => escaped.push_str("&#xD;"),
            '\n' => escaped.push_str("&#xA;"),
            '\t' => escaped.push_str("&#x9;"),
            other => escaped.push(other),
        }
    }
    escaped
}
