/*
 * Copyright © 2024 Volodymyr Kadzhaia
 * Copyright © 2024 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::BTreeMap;

use crate::term::{BlankNode, Iri, Literal, Term};

/// One slot of a triple pattern: a named variable or a concrete term to
/// match against. Variables are legal in any position, the predicate
/// included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternTerm {
    Variable(String),
    Constant(Term),
}

impl PatternTerm {
    /// Variable by name; a leading `?` marker is stripped if present.
    pub fn var(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.strip_prefix('?') {
            Some(stripped) => PatternTerm::Variable(stripped.to_string()),
            None => PatternTerm::Variable(name),
        }
    }

    pub fn is_var(&self) -> bool {
        matches!(self, PatternTerm::Variable(_))
    }
}

impl From<Term> for PatternTerm {
    fn from(term: Term) -> Self {
        PatternTerm::Constant(term)
    }
}

impl From<Iri> for PatternTerm {
    fn from(iri: Iri) -> Self {
        PatternTerm::Constant(Term::Iri(iri))
    }
}

impl From<Literal> for PatternTerm {
    fn from(literal: Literal) -> Self {
        PatternTerm::Constant(Term::Literal(literal))
    }
}

impl From<BlankNode> for PatternTerm {
    fn from(blank: BlankNode) -> Self {
        PatternTerm::Constant(Term::BlankNode(blank))
    }
}

/// A triple pattern over subject, predicate and object slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
}

impl TriplePattern {
    pub fn new(
        subject: impl Into<PatternTerm>,
        predicate: impl Into<PatternTerm>,
        object: impl Into<PatternTerm>,
    ) -> Self {
        TriplePattern {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Names of the variables this pattern mentions, in slot order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .filter_map(|slot| match slot {
                PatternTerm::Variable(name) => Some(name.as_str()),
                PatternTerm::Constant(_) => None,
            })
    }
}

/// One solution row: variable name to the term bound for it.
pub type Binding = BTreeMap<String, Term>;
