/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use serde::Serialize;
use shared::pattern::{Binding, PatternTerm, TriplePattern};
use shared::term::Term;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::RdfError;
use crate::store::TripleStore;

// A pattern slot after dictionary lookup: variables keep their name,
// constants become interned ids.
enum Slot {
    Variable(String),
    Id(u32),
}

struct EncodedPattern {
    subject: Slot,
    predicate: Slot,
    object: Slot,
}

/// Evaluate conjunctive triple patterns against the store and project the
/// named variables. Projecting a variable no pattern mentions is an error,
/// raised before any matching happens; a query that simply matches nothing
/// returns an empty solution set instead.
///
/// Patterns are joined left to right: each pattern extends the rows built
/// so far with every triple consistent with the bindings already made.
pub fn evaluate_patterns(
    store: &TripleStore,
    patterns: &[TriplePattern],
    projected: &[&str],
) -> Result<Solutions, RdfError> {
    let mut mentioned: BTreeSet<&str> = BTreeSet::new();
    for pattern in patterns {
        mentioned.extend(pattern.variables());
    }
    for name in projected {
        if !mentioned.contains(name) {
            return Err(RdfError::UnboundVariable((*name).to_string()));
        }
    }

    let variables: Vec<String> = projected.iter().map(|name| name.to_string()).collect();

    // A constant the dictionary has never seen cannot match any triple.
    let encoded = match encode_patterns(store, patterns) {
        Some(encoded) => encoded,
        None => {
            return Ok(Solutions {
                variables,
                rows: Vec::new(),
            })
        }
    };

    let mut rows: Vec<HashMap<String, u32>> = vec![HashMap::new()];
    for pattern in &encoded {
        rows = extend_rows(store, pattern, &rows);
        if rows.is_empty() {
            break;
        }
    }

    let rows = rows
        .iter()
        .map(|row| project_row(store, row, &variables))
        .collect();

    Ok(Solutions { variables, rows })
}

fn encode_patterns(store: &TripleStore, patterns: &[TriplePattern]) -> Option<Vec<EncodedPattern>> {
    patterns
        .iter()
        .map(|pattern| {
            Some(EncodedPattern {
                subject: encode_slot(store, &pattern.subject)?,
                predicate: encode_slot(store, &pattern.predicate)?,
                object: encode_slot(store, &pattern.object)?,
            })
        })
        .collect()
}

fn encode_slot(store: &TripleStore, slot: &PatternTerm) -> Option<Slot> {
    match slot {
        PatternTerm::Variable(name) => Some(Slot::Variable(name.clone())),
        PatternTerm::Constant(term) => store.dictionary.lookup(term).map(Slot::Id),
    }
}

// One join step: try every triple against every row built so far
fn extend_rows(
    store: &TripleStore,
    pattern: &EncodedPattern,
    rows: &[HashMap<String, u32>],
) -> Vec<HashMap<String, u32>> {
    let mut extended_rows = Vec::new();

    for triple in &store.triples {
        for row in rows {
            let mut extended = row.clone();
            if bind_slot(&pattern.subject, triple.subject, &mut extended)
                && bind_slot(&pattern.predicate, triple.predicate, &mut extended)
                && bind_slot(&pattern.object, triple.object, &mut extended)
            {
                extended_rows.push(extended);
            }
        }
    }

    extended_rows
}

// A constant must equal the triple's id; a variable either agrees with its
// earlier binding or binds now
fn bind_slot(slot: &Slot, id: u32, row: &mut HashMap<String, u32>) -> bool {
    match slot {
        Slot::Id(expected) => *expected == id,
        Slot::Variable(name) => match row.get(name) {
            Some(&bound) => bound == id,
            None => {
                row.insert(name.clone(), id);
                true
            }
        },
    }
}

fn project_row(store: &TripleStore, row: &HashMap<String, u32>, variables: &[String]) -> Binding {
    let mut binding = Binding::new();
    for name in variables {
        if let Some(&id) = row.get(name) {
            if let Some(term) = store.dictionary.decode(id) {
                binding.insert(name.clone(), term.clone());
            }
        }
    }
    binding
}

/// Solutions of a pattern match: the projected variable names plus one
/// binding per row. Rows are materialized, so the set can be walked any
/// number of times; duplicate rows are kept as they were produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Solutions {
    variables: Vec<String>,
    rows: Vec<Binding>,
}

impl Solutions {
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Binding> {
        self.rows.iter()
    }

    /// Render the solutions in the SPARQL 1.1 Query Results JSON format.
    pub fn to_json(&self) -> String {
        let bindings = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|(name, term)| (name.as_str(), json_term(term)))
                    .collect()
            })
            .collect();
        let document = JsonResults {
            head: JsonHead {
                vars: &self.variables,
            },
            results: JsonRows { bindings },
        };
        serde_json::to_string(&document).expect("result document serializes")
    }
}

impl IntoIterator for Solutions {
    type Item = Binding;
    type IntoIter = std::vec::IntoIter<Binding>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a Solutions {
    type Item = &'a Binding;
    type IntoIter = std::slice::Iter<'a, Binding>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[derive(Serialize)]
struct JsonResults<'a> {
    head: JsonHead<'a>,
    results: JsonRows<'a>,
}

#[derive(Serialize)]
struct JsonHead<'a> {
    vars: &'a [String],
}

#[derive(Serialize)]
struct JsonRows<'a> {
    bindings: Vec<BTreeMap<&'a str, JsonTerm<'a>>>,
}

#[derive(Serialize)]
struct JsonTerm<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
    #[serde(rename = "xml:lang", skip_serializing_if = "Option::is_none")]
    lang: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    datatype: Option<&'a str>,
}

fn json_term(term: &Term) -> JsonTerm<'_> {
    match term {
        Term::Iri(iri) => JsonTerm {
            kind: "uri",
            value: iri.as_str(),
            lang: None,
            datatype: None,
        },
        Term::BlankNode(blank) => JsonTerm {
            kind: "bnode",
            value: blank.as_str(),
            lang: None,
            datatype: None,
        },
        Term::Literal(literal) => JsonTerm {
            kind: "literal",
            value: &literal.lexical,
            lang: literal.language.as_deref(),
            datatype: literal.datatype.as_ref().map(|iri| iri.as_str()),
        },
    }
}
