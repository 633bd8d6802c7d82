/*
 * Copyright © 2024 Volodymyr Kadzhaia
 * Copyright © 2024 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use log::{debug, warn};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Reader;
use shared::term::{BlankNode, Iri, Literal, Subject, Term};
use shared::triple::Triple;
use shared::vocab;
use std::collections::BTreeMap;

use crate::error::RdfError;
use crate::store::TripleStore;

// Node elements and property elements alternate with nesting depth, so the
// parity of the open-element stack says which kind the next element is.
enum Frame {
    Node {
        subject: Subject,
        lang: Option<String>,
    },
    Property {
        subject: Subject,
        predicate: Iri,
        datatype: Option<Iri>,
        lang: Option<String>,
        text: String,
        has_object: bool,
    },
}

/// Parse an RDF/XML document into a fresh store. The document has to be
/// rooted at rdf:RDF; xmlns declarations are registered on the store as
/// prefix bindings. rdf:parseType is not supported and is rejected.
pub fn parse_rdf_xml(data: &str) -> Result<TripleStore, RdfError> {
    let mut reader = Reader::from_str(data);
    reader.trim_text(true);
    reader.check_comments(false);
    reader.expand_empty_elements(false);

    let mut store = TripleStore::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut root_lang: Option<String> = None;
    let mut saw_root = false;
    let mut blank_counter: u32 = 0;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                collect_namespaces(e, &mut store)?;
                if !saw_root {
                    expect_rdf_root(e)?;
                    root_lang = xml_lang(e)?;
                    saw_root = true;
                    continue;
                }
                if stack.len() % 2 == 0 {
                    open_node(e, false, &mut stack, &mut store, &mut blank_counter, &root_lang)?;
                } else {
                    open_property(e, false, &mut stack, &mut store, &root_lang)?;
                }
            }
            Ok(Event::Empty(ref e)) => {
                collect_namespaces(e, &mut store)?;
                if !saw_root {
                    expect_rdf_root(e)?;
                    saw_root = true;
                    continue;
                }
                if stack.len() % 2 == 0 {
                    open_node(e, true, &mut stack, &mut store, &mut blank_counter, &root_lang)?;
                } else {
                    open_property(e, true, &mut stack, &mut store, &root_lang)?;
                }
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| RdfError::Parse(format!("bad text content: {}", err)))?;
                match stack.last_mut() {
                    Some(Frame::Property {
                        text: buffer,
                        has_object,
                        ..
                    }) => {
                        if *has_object {
                            warn!("ignoring text next to a resource object: {:?}", text);
                        } else {
                            buffer.push_str(&text);
                        }
                    }
                    _ => {
                        return Err(RdfError::Parse(format!(
                            "unexpected text outside a property element: {:?}",
                            text.trim()
                        )))
                    }
                }
            }
            Ok(Event::End(_)) => {
                match stack.pop() {
                    Some(Frame::Node { .. }) => {}
                    Some(Frame::Property {
                        subject,
                        predicate,
                        datatype,
                        lang,
                        text,
                        has_object,
                    }) => {
                        if !has_object {
                            let literal = make_literal(text, datatype, lang);
                            store.insert(Triple::new(subject, predicate, Term::Literal(literal)));
                        }
                    }
                    // closing rdf:RDF; the reader itself catches mismatched tags
                    None => {}
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(RdfError::Parse(format!(
                    "XML error at byte {}: {}",
                    reader.buffer_position(),
                    err
                )))
            }
        }
    }

    if !saw_root {
        return Err(RdfError::Parse(
            "expected an rdf:RDF root element".to_string(),
        ));
    }
    if !stack.is_empty() {
        return Err(RdfError::Parse(
            "document ended inside an open element".to_string(),
        ));
    }

    debug!("parsed {} triples from rdf/xml document", store.len());
    Ok(store)
}

fn expect_rdf_root(e: &BytesStart) -> Result<(), RdfError> {
    if e.name().as_ref() == b"rdf:RDF" {
        Ok(())
    } else {
        Err(RdfError::Parse(format!(
            "expected an rdf:RDF root element, found '{}'",
            String::from_utf8_lossy(e.name().as_ref())
        )))
    }
}

// Any element may declare xmlns prefixes; they all land on the store
fn collect_namespaces(e: &BytesStart, store: &mut TripleStore) -> Result<(), RdfError> {
    for attr in e.attributes().filter_map(Result::ok) {
        let key = attr.key;
        if key.as_ref().starts_with(b"xmlns:") {
            let prefix = String::from_utf8_lossy(&key.as_ref()[6..]).to_string();
            let namespace = attr_value(&attr)?;
            store.bind(&prefix, &namespace);
        } else if key.as_ref() == b"xmlns" {
            let namespace = attr_value(&attr)?;
            store.bind("", &namespace);
        }
    }
    Ok(())
}

fn attr_value(attr: &Attribute<'_>) -> Result<String, RdfError> {
    attr.unescape_value()
        .map(|value| value.into_owned())
        .map_err(|err| RdfError::Parse(format!("bad attribute value: {}", err)))
}

fn expand_qname(name: QName<'_>, store: &TripleStore) -> Result<Iri, RdfError> {
    let name = std::str::from_utf8(name.as_ref())
        .map_err(|_| RdfError::Parse("element name is not UTF-8".to_string()))?;
    match name.split_once(':') {
        Some((prefix, local)) => match store.namespace(prefix) {
            Some(namespace) => Ok(Iri::new(format!("{}{}", namespace, local))),
            None => Err(RdfError::Parse(format!(
                "unknown namespace prefix '{}:'",
                prefix
            ))),
        },
        None => match store.namespace("") {
            Some(namespace) => Ok(Iri::new(format!("{}{}", namespace, name))),
            None => Err(RdfError::Parse(format!(
                "element '{}' has no namespace in scope",
                name
            ))),
        },
    }
}

fn node_subject(e: &BytesStart, blank_counter: &mut u32) -> Result<Subject, RdfError> {
    for attr in e.attributes().filter_map(Result::ok) {
        if attr.key == QName(b"rdf:about") {
            return Ok(Subject::Iri(Iri::new(attr_value(&attr)?)));
        }
        if attr.key == QName(b"rdf:nodeID") {
            return Ok(Subject::BlankNode(BlankNode::new(attr_value(&attr)?)));
        }
    }
    // anonymous node elements get generated blank labels
    let subject = Subject::BlankNode(BlankNode::new(format!("genid-{}", *blank_counter)));
    *blank_counter += 1;
    Ok(subject)
}

fn xml_lang(e: &BytesStart) -> Result<Option<String>, RdfError> {
    for attr in e.attributes().filter_map(Result::ok) {
        if attr.key == QName(b"xml:lang") {
            return Ok(Some(attr_value(&attr)?));
        }
    }
    Ok(None)
}

fn reject_parse_type(e: &BytesStart) -> Result<(), RdfError> {
    for attr in e.attributes().filter_map(Result::ok) {
        if attr.key == QName(b"rdf:parseType") {
            return Err(RdfError::Parse(
                "rdf:parseType is not supported".to_string(),
            ));
        }
    }
    Ok(())
}

// xml:lang scopes over everything below the element that set it
fn inherited_lang(stack: &[Frame], root_lang: &Option<String>) -> Option<String> {
    stack
        .iter()
        .rev()
        .find_map(|frame| match frame {
            Frame::Node { lang, .. } | Frame::Property { lang, .. } => lang.clone(),
        })
        .or_else(|| root_lang.clone())
}

// A datatype beats a language tag. An empty xml:lang cancels any inherited
// language, leaving the literal plain.
fn make_literal(lexical: String, datatype: Option<Iri>, lang: Option<String>) -> Literal {
    let lang = lang.filter(|lang| !lang.is_empty());
    match (datatype, lang) {
        (Some(datatype), _) => Literal::typed(lexical, datatype),
        (None, Some(lang)) => Literal::with_language(lexical, lang),
        (None, None) => Literal::simple(lexical),
    }
}

fn open_node(
    e: &BytesStart,
    is_empty: bool,
    stack: &mut Vec<Frame>,
    store: &mut TripleStore,
    blank_counter: &mut u32,
    root_lang: &Option<String>,
) -> Result<(), RdfError> {
    reject_parse_type(e)?;
    let subject = node_subject(e, blank_counter)?;
    let lang = match xml_lang(e)? {
        Some(lang) => Some(lang),
        None => inherited_lang(stack, root_lang),
    };

    // a typed node element asserts its name as the rdf:type
    if e.name().as_ref() != b"rdf:Description" {
        let type_iri = expand_qname(e.name(), store)?;
        store.insert(Triple::new(
            subject.clone(),
            Iri::new(vocab::RDF_TYPE),
            Term::Iri(type_iri),
        ));
    }

    // a node nested under a property element is that property's object
    let parent_link = match stack.last_mut() {
        Some(Frame::Property {
            subject: parent,
            predicate,
            has_object,
            ..
        }) => {
            *has_object = true;
            Some((parent.clone(), predicate.clone()))
        }
        _ => None,
    };
    if let Some((parent, predicate)) = parent_link {
        store.insert(Triple::new(parent, predicate, Term::from(subject.clone())));
    }

    if !is_empty {
        stack.push(Frame::Node { subject, lang });
    }
    Ok(())
}

fn open_property(
    e: &BytesStart,
    is_empty: bool,
    stack: &mut Vec<Frame>,
    store: &mut TripleStore,
    root_lang: &Option<String>,
) -> Result<(), RdfError> {
    reject_parse_type(e)?;
    let subject = match stack.last() {
        Some(Frame::Node { subject, .. }) => subject.clone(),
        _ => {
            return Err(RdfError::Parse(
                "property element outside a node element".to_string(),
            ))
        }
    };
    let predicate = expand_qname(e.name(), store)?;
    let lang = match xml_lang(e)? {
        Some(lang) => Some(lang),
        None => inherited_lang(stack, root_lang),
    };

    let mut object: Option<Term> = None;
    let mut datatype: Option<Iri> = None;
    for attr in e.attributes().filter_map(Result::ok) {
        if attr.key == QName(b"rdf:resource") {
            object = Some(Term::Iri(Iri::new(attr_value(&attr)?)));
        } else if attr.key == QName(b"rdf:nodeID") {
            object = Some(Term::BlankNode(BlankNode::new(attr_value(&attr)?)));
        } else if attr.key == QName(b"rdf:datatype") {
            datatype = Some(Iri::new(attr_value(&attr)?));
        }
    }

    let has_object = object.is_some();
    if let Some(object) = object {
        store.insert(Triple::new(subject.clone(), predicate.clone(), object));
    } else if is_empty {
        // an empty property element with no resource is the empty literal
        let literal = make_literal(String::new(), datatype.clone(), lang.clone());
        store.insert(Triple::new(
            subject.clone(),
            predicate.clone(),
            Term::Literal(literal),
        ));
    }

    if !is_empty {
        stack.push(Frame::Property {
            subject,
            predicate,
            datatype,
            lang,
            text: String::new(),
            has_object,
        });
    }
    Ok(())
}

/// Serialize the store as RDF/XML, one rdf:Description per subject. A
/// predicate no bound namespace can qualify gets a synthesized nsN prefix;
/// one that cannot be split into a namespace and an XML name at all is
/// skipped with a warning.
pub fn write_rdf_xml(store: &TripleStore) -> String {
    let mut namespaces: Vec<(String, String)> =
        vec![("rdf".to_string(), vocab::RDF_NS.to_string())];
    for (prefix, namespace) in store.prefixes() {
        if prefix.is_empty() || namespace.is_empty() || prefix == "rdf" {
            continue;
        }
        namespaces.push((prefix.to_string(), namespace.to_string()));
    }
    namespaces.sort();

    let mut triples: Vec<Triple> = store.iter().collect();
    triples.sort_by_cached_key(|triple| {
        (
            triple.subject.to_string(),
            triple.predicate.to_string(),
            triple.object.to_string(),
        )
    });

    // pick a QName for every predicate up front, extending the namespace
    // table where none of the bound ones apply
    let mut qnames: BTreeMap<String, String> = BTreeMap::new();
    let mut synthesized = 0;
    for triple in &triples {
        let iri = triple.predicate.as_str();
        if qnames.contains_key(iri) {
            continue;
        }
        if let Some(qname) = qname_for(iri, &namespaces) {
            qnames.insert(iri.to_string(), qname);
        } else if let Some((namespace, local)) = split_predicate(iri) {
            let prefix = format!("ns{}", synthesized);
            synthesized += 1;
            qnames.insert(iri.to_string(), format!("{}:{}", prefix, local));
            namespaces.push((prefix, namespace.to_string()));
        } else {
            warn!(
                "cannot express predicate <{}> in RDF/XML, skipping its triples",
                iri
            );
        }
    }

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\"?>\n");
    xml.push_str("<rdf:RDF");
    for (prefix, namespace) in &namespaces {
        xml.push_str(&format!(
            " xmlns:{}=\"{}\"",
            prefix,
            escape_attribute(namespace)
        ));
    }
    xml.push_str(">\n");

    let mut groups: BTreeMap<String, Vec<&Triple>> = BTreeMap::new();
    for triple in &triples {
        groups
            .entry(triple.subject.to_string())
            .or_default()
            .push(triple);
    }

    for group in groups.values() {
        match &group[0].subject {
            Subject::Iri(iri) => xml.push_str(&format!(
                "  <rdf:Description rdf:about=\"{}\">\n",
                escape_attribute(iri.as_str())
            )),
            Subject::BlankNode(blank) => xml.push_str(&format!(
                "  <rdf:Description rdf:nodeID=\"{}\">\n",
                escape_attribute(blank.as_str())
            )),
        }
        for triple in group.iter() {
            let qname = match qnames.get(triple.predicate.as_str()) {
                Some(qname) => qname,
                None => continue,
            };
            match &triple.object {
                Term::Iri(iri) => xml.push_str(&format!(
                    "    <{} rdf:resource=\"{}\"/>\n",
                    qname,
                    escape_attribute(iri.as_str())
                )),
                Term::BlankNode(blank) => xml.push_str(&format!(
                    "    <{} rdf:nodeID=\"{}\"/>\n",
                    qname,
                    escape_attribute(blank.as_str())
                )),
                Term::Literal(literal) => {
                    xml.push_str(&format!("    <{}", qname));
                    if let Some(language) = &literal.language {
                        xml.push_str(&format!(" xml:lang=\"{}\"", escape_attribute(language)));
                    } else if let Some(datatype) = &literal.datatype {
                        xml.push_str(&format!(
                            " rdf:datatype=\"{}\"",
                            escape_attribute(datatype.as_str())
                        ));
                    }
                    xml.push_str(&format!(">{}</{}>\n", escape_text(&literal.lexical), qname));
                }
            }
        }
        xml.push_str("  </rdf:Description>\n");
    }

    xml.push_str("</rdf:RDF>\n");
    xml
}

// Longest matching namespace wins, ties go to the smallest prefix name
fn qname_for(iri: &str, namespaces: &[(String, String)]) -> Option<String> {
    let mut best: Option<(&str, &str)> = None;
    for (prefix, namespace) in namespaces {
        if let Some(local) = iri.strip_prefix(namespace.as_str()) {
            if !is_xml_name(local) {
                continue;
            }
            let replace = match best {
                Some((best_prefix, best_namespace)) => {
                    namespace.len() > best_namespace.len()
                        || (namespace.len() == best_namespace.len()
                            && prefix.as_str() < best_prefix)
                }
                None => true,
            };
            if replace {
                best = Some((prefix.as_str(), namespace.as_str()));
            }
        }
    }
    best.map(|(prefix, namespace)| format!("{}:{}", prefix, &iri[namespace.len()..]))
}

// XML element names: a leading letter or underscore, then letters, digits,
// '_', '-' or '.'
fn is_xml_name(local: &str) -> bool {
    let mut chars = local.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
}

// Split after the last '#' or '/' if the remainder is a usable XML name
fn split_predicate(iri: &str) -> Option<(&str, &str)> {
    let pos = iri.rfind(|c| c == '#' || c == '/')?;
    let (namespace, local) = iri.split_at(pos + 1);
    if is_xml_name(local) {
        Some((namespace, local))
    } else {
        None
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}
