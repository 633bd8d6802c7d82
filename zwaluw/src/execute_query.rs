/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use log::debug;
use shared::pattern::{PatternTerm, TriplePattern};
use shared::term::{BlankNode, Iri, Literal, Term};
use shared::vocab;
use std::collections::{BTreeSet, HashMap};

use crate::error::{format_query_error, RdfError};
use crate::matcher::{evaluate_patterns, Solutions};
use crate::parser::{parse_select_query, Projection, UnresolvedIri, UnresolvedTerm};
use crate::store::TripleStore;

// Prefixes every query understands without declaring them
const BUILTIN_PREFIXES: &[(&str, &str)] = &[
    ("rdf", vocab::RDF_NS),
    ("rdfs", vocab::RDFS_NS),
    ("owl", vocab::OWL_NS),
    ("xsd", vocab::XSD_NS),
    ("foaf", vocab::FOAF_NS),
    ("dc", vocab::DC_NS),
];

/// Run a conjunctive SELECT query against the store. The store is never
/// modified; prefixed names resolve against the query's own PREFIX
/// declarations first, then the store's bindings, then the built-ins.
/// `SELECT *` projects every mentioned variable in name order.
pub fn execute_select(query: &str, store: &TripleStore) -> Result<Solutions, RdfError> {
    let parsed = match parse_select_query(query) {
        Ok(("", parsed)) => parsed,
        Ok((rest, _)) => {
            return Err(RdfError::Parse(format!(
                "trailing input after query: {:?}",
                rest.trim()
            )))
        }
        Err(err) => return Err(RdfError::Parse(format_query_error(query, err))),
    };

    let patterns = parsed
        .patterns
        .iter()
        .map(|(subject, predicate, object)| {
            Ok(TriplePattern {
                subject: resolve_query_term(subject, &parsed.prefixes, store)?,
                predicate: resolve_query_term(predicate, &parsed.prefixes, store)?,
                object: resolve_query_term(object, &parsed.prefixes, store)?,
            })
        })
        .collect::<Result<Vec<_>, RdfError>>()?;

    let projected: Vec<&str> = match &parsed.projection {
        Projection::Star => {
            let mut variables = BTreeSet::new();
            for pattern in &patterns {
                variables.extend(pattern.variables());
            }
            variables.into_iter().collect()
        }
        Projection::Variables(variables) => variables.clone(),
    };

    debug!(
        "executing select: {} patterns, {} projected variables",
        patterns.len(),
        projected.len()
    );
    evaluate_patterns(store, &patterns, &projected)
}

fn resolve_query_term(
    term: &UnresolvedTerm<'_>,
    prefixes: &HashMap<String, String>,
    store: &TripleStore,
) -> Result<PatternTerm, RdfError> {
    match term {
        UnresolvedTerm::Variable(name) => Ok(PatternTerm::Variable((*name).to_string())),
        UnresolvedTerm::Iri(iri) => Ok(PatternTerm::Constant(Term::Iri(resolve_query_iri(
            *iri, prefixes, store,
        )?))),
        UnresolvedTerm::Blank(label) => {
            Ok(PatternTerm::Constant(Term::BlankNode(BlankNode::new(*label))))
        }
        UnresolvedTerm::Literal {
            lexical,
            language,
            datatype,
        } => {
            let literal = if let Some(language) = language {
                Literal::with_language(lexical.clone(), *language)
            } else if let Some(datatype) = datatype {
                Literal::typed(lexical.clone(), resolve_query_iri(*datatype, prefixes, store)?)
            } else {
                Literal::simple(lexical.clone())
            };
            Ok(PatternTerm::Constant(Term::Literal(literal)))
        }
    }
}

// Query prefixes first, then the store's, then the built-ins
fn resolve_query_iri(
    iri: UnresolvedIri<'_>,
    prefixes: &HashMap<String, String>,
    store: &TripleStore,
) -> Result<Iri, RdfError> {
    match iri {
        UnresolvedIri::Full(value) => Ok(Iri::new(value)),
        UnresolvedIri::Prefixed(prefix, local) => {
            if let Some(namespace) = prefixes.get(prefix) {
                Ok(Iri::new(format!("{}{}", namespace, local)))
            } else if let Some(namespace) = store.namespace(prefix) {
                Ok(Iri::new(format!("{}{}", namespace, local)))
            } else if let Some(namespace) = builtin_namespace(prefix) {
                Ok(Iri::new(format!("{}{}", namespace, local)))
            } else {
                Err(RdfError::Parse(format!(
                    "unknown prefix '{}:' in query",
                    prefix
                )))
            }
        }
    }
}

fn builtin_namespace(prefix: &str) -> Option<&'static str> {
    BUILTIN_PREFIXES
        .iter()
        .find(|(builtin, _)| *builtin == prefix)
        .map(|(_, namespace)| *namespace)
}
