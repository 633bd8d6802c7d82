/*
 * Copyright © 2024 Volodymyr Kadzhaia
 * Copyright © 2024 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use log::debug;
use nom::{
    bytes::complete::tag,
    character::complete::{char, multispace0, multispace1},
    combinator::opt,
    multi::{many0, separated_list1},
    sequence::{preceded, tuple},
    IResult,
};
use shared::term::{escape_literal, BlankNode, Iri, Literal, Subject, Term};
use shared::triple::Triple;
use shared::vocab;
use std::collections::HashMap;

use crate::error::{format_syntax_error, RdfError};
use crate::parser::{
    data_object, data_predicate, data_subject, identifier, iri_ref, UnresolvedIri, UnresolvedTerm,
    UnresolvedTriple,
};
use crate::store::TripleStore;

/// Parse a Turtle document into a fresh store. Prefix directives are
/// registered on the store as they are read; statements resolve against
/// the directives seen so far, and an undeclared prefix is a parse error.
pub fn parse_turtle(data: &str) -> Result<TripleStore, RdfError> {
    let mut store = TripleStore::new();
    let mut input = data;

    loop {
        input = skip_trivia(input);
        if input.is_empty() {
            break;
        }

        if let Ok((rest, (prefix, namespace))) = parse_prefix_directive(input) {
            store.bind(prefix, namespace);
            input = rest;
            continue;
        }

        match parse_statement(input) {
            Ok((rest, statements)) => {
                for (subject, predicate, object) in &statements {
                    let triple = resolve_statement(subject, predicate, object, &store.prefixes)?;
                    store.insert(triple);
                }
                input = rest;
            }
            Err(err) => return Err(RdfError::Parse(format_syntax_error(data, err))),
        }
    }

    debug!("parsed {} triples from turtle document", store.len());
    Ok(store)
}

// Whitespace and '#' comments between statements
fn skip_trivia(mut input: &str) -> &str {
    loop {
        let trimmed = input.trim_start();
        match trimmed.strip_prefix('#') {
            Some(comment) => {
                input = match comment.find('\n') {
                    Some(pos) => &comment[pos + 1..],
                    None => "",
                };
            }
            None => return trimmed,
        }
    }
}

// @prefix foaf: <http://xmlns.com/foaf/0.1/> .
fn parse_prefix_directive(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, _) = tag("@prefix")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, prefix) = opt(identifier)(input)?;
    let (input, _) = char(':')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, namespace) = iri_ref(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('.')(input)?;
    Ok((input, (prefix.unwrap_or(""), namespace)))
}

// One predicate with its comma-separated objects
fn statement_predicate_objects(
    input: &str,
) -> IResult<&str, Vec<(UnresolvedTerm<'_>, UnresolvedTerm<'_>)>> {
    let (input, predicate) = data_predicate(input)?;
    let (input, _) = multispace1(input)?;
    let (input, objects) = separated_list1(
        tuple((multispace0, char(','), multispace0)),
        data_object,
    )(input)?;
    Ok((
        input,
        objects
            .into_iter()
            .map(|object| (predicate.clone(), object))
            .collect(),
    ))
}

// A full statement: subject, ';'-separated predicate-object groups, '.'
fn parse_statement(input: &str) -> IResult<&str, Vec<UnresolvedTriple<'_>>> {
    let (input, subject) = data_subject(input)?;
    let (input, _) = multispace1(input)?;

    let (input, first_group) = statement_predicate_objects(input)?;
    let (input, rest_groups) = many0(preceded(
        tuple((multispace0, char(';'), multispace0)),
        statement_predicate_objects,
    ))(input)?;

    let (input, _) = multispace0(input)?;
    let (input, _) = char('.')(input)?;

    let mut triples = Vec::new();
    for (predicate, object) in first_group
        .into_iter()
        .chain(rest_groups.into_iter().flatten())
    {
        triples.push((subject.clone(), predicate, object));
    }
    Ok((input, triples))
}

fn resolve_statement(
    subject: &UnresolvedTerm<'_>,
    predicate: &UnresolvedTerm<'_>,
    object: &UnresolvedTerm<'_>,
    prefixes: &HashMap<String, String>,
) -> Result<Triple, RdfError> {
    let subject = match resolve_term(subject, prefixes)? {
        Term::Iri(iri) => Subject::Iri(iri),
        Term::BlankNode(blank) => Subject::BlankNode(blank),
        Term::Literal(_) => {
            return Err(RdfError::Parse("a literal cannot be a subject".to_string()))
        }
    };
    let predicate = match resolve_term(predicate, prefixes)? {
        Term::Iri(iri) => iri,
        _ => return Err(RdfError::Parse("a predicate must be an IRI".to_string())),
    };
    let object = resolve_term(object, prefixes)?;
    Ok(Triple {
        subject,
        predicate,
        object,
    })
}

fn resolve_term(
    term: &UnresolvedTerm<'_>,
    prefixes: &HashMap<String, String>,
) -> Result<Term, RdfError> {
    match term {
        UnresolvedTerm::Iri(iri) => Ok(Term::Iri(resolve_iri(*iri, prefixes)?)),
        UnresolvedTerm::Blank(label) => Ok(Term::BlankNode(BlankNode::new(*label))),
        UnresolvedTerm::Literal {
            lexical,
            language,
            datatype,
        } => {
            let literal = if let Some(language) = language {
                Literal::with_language(lexical.clone(), *language)
            } else if let Some(datatype) = datatype {
                Literal::typed(lexical.clone(), resolve_iri(*datatype, prefixes)?)
            } else {
                Literal::simple(lexical.clone())
            };
            Ok(Term::Literal(literal))
        }
        UnresolvedTerm::Variable(name) => Err(RdfError::Parse(format!(
            "variables like ?{} cannot appear in data",
            name
        ))),
    }
}

fn resolve_iri(
    iri: UnresolvedIri<'_>,
    prefixes: &HashMap<String, String>,
) -> Result<Iri, RdfError> {
    match iri {
        UnresolvedIri::Full(value) => Ok(Iri::new(value)),
        UnresolvedIri::Prefixed(prefix, local) => match prefixes.get(prefix) {
            Some(namespace) => Ok(Iri::new(format!("{}{}", namespace, local))),
            None => Err(RdfError::Parse(format!(
                "unknown prefix '{}:' in document",
                prefix
            ))),
        },
    }
}

/// Serialize the store as Turtle. Prefix lines are sorted by prefix name
/// and triples by the string forms of (subject, predicate, object), so the
/// same graph always produces the same bytes. Triples sharing a subject are
/// grouped with ';' and IRIs are abbreviated against the bound prefixes.
pub fn write_turtle(store: &TripleStore) -> String {
    let mut prefixes: Vec<(&str, &str)> = store.prefixes().collect();
    prefixes.sort();

    let mut out = String::new();
    for &(prefix, namespace) in &prefixes {
        out.push_str(&format!("@prefix {}: <{}> .\n", prefix, namespace));
    }

    let mut triples: Vec<Triple> = store.iter().collect();
    triples.sort_by_cached_key(|triple| {
        (
            triple.subject.to_string(),
            triple.predicate.to_string(),
            triple.object.to_string(),
        )
    });

    if !prefixes.is_empty() && !triples.is_empty() {
        out.push('\n');
    }

    let mut current_subject: Option<&Subject> = None;
    for triple in &triples {
        let predicate = render_predicate(&triple.predicate, &prefixes);
        let object = render_term(&triple.object, &prefixes);
        match current_subject {
            Some(subject) if *subject == triple.subject => {
                out.push_str(&format!(" ;\n    {} {}", predicate, object));
            }
            _ => {
                if current_subject.is_some() {
                    out.push_str(" .\n\n");
                }
                let subject = render_subject(&triple.subject, &prefixes);
                out.push_str(&format!("{} {} {}", subject, predicate, object));
                current_subject = Some(&triple.subject);
            }
        }
    }
    if current_subject.is_some() {
        out.push_str(" .\n");
    }

    out
}

// Longest matching namespace wins; equally long namespaces fall back to the
// smallest prefix name, keeping the choice deterministic
fn compact(iri: &str, prefixes: &[(&str, &str)]) -> Option<String> {
    let mut best: Option<(&str, &str)> = None;
    for &(prefix, namespace) in prefixes {
        // an empty namespace would swallow every IRI
        if namespace.is_empty() {
            continue;
        }
        if let Some(local) = iri.strip_prefix(namespace) {
            if !is_local_name(local) {
                continue;
            }
            let replace = match best {
                Some((best_prefix, best_namespace)) => {
                    namespace.len() > best_namespace.len()
                        || (namespace.len() == best_namespace.len() && prefix < best_prefix)
                }
                None => true,
            };
            if replace {
                best = Some((prefix, namespace));
            }
        }
    }
    best.map(|(prefix, namespace)| format!("{}:{}", prefix, &iri[namespace.len()..]))
}

// The local part has to read back as a plain identifier
fn is_local_name(local: &str) -> bool {
    !local.is_empty() && local.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn render_iri(iri: &Iri, prefixes: &[(&str, &str)]) -> String {
    compact(iri.as_str(), prefixes).unwrap_or_else(|| format!("<{}>", iri.as_str()))
}

fn render_subject(subject: &Subject, prefixes: &[(&str, &str)]) -> String {
    match subject {
        Subject::Iri(iri) => render_iri(iri, prefixes),
        Subject::BlankNode(blank) => format!("_:{}", blank.as_str()),
    }
}

fn render_predicate(predicate: &Iri, prefixes: &[(&str, &str)]) -> String {
    if predicate.as_str() == vocab::RDF_TYPE {
        "a".to_string()
    } else {
        render_iri(predicate, prefixes)
    }
}

fn render_term(term: &Term, prefixes: &[(&str, &str)]) -> String {
    match term {
        Term::Iri(iri) => render_iri(iri, prefixes),
        Term::BlankNode(blank) => format!("_:{}", blank.as_str()),
        Term::Literal(literal) => {
            let mut out = format!("\"{}\"", escape_literal(&literal.lexical));
            if let Some(language) = &literal.language {
                out.push('@');
                out.push_str(language);
            } else if let Some(datatype) = &literal.datatype {
                out.push_str("^^");
                out.push_str(&render_iri(datatype, prefixes));
            }
            out
        }
    }
}
