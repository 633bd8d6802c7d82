/*
 * Copyright © 2024 ladroid
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::HashMap;

use crate::term::{Subject, Term};
use crate::triple::{EncodedTriple, Triple};

// Dictionary for encoding and decoding terms
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TermDictionary {
    term_to_id: HashMap<Term, u32>,
    id_to_term: HashMap<u32, Term>,
    next_id: u32,
}

impl TermDictionary {
    pub fn new() -> Self {
        TermDictionary {
            term_to_id: HashMap::new(),
            id_to_term: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn encode(&mut self, term: &Term) -> u32 {
        if let Some(&id) = self.term_to_id.get(term) {
            id
        } else {
            let id = self.next_id;
            self.term_to_id.insert(term.clone(), id);
            self.id_to_term.insert(id, term.clone());
            self.next_id += 1;
            id
        }
    }

    /// Id of an already interned term, without interning it.
    pub fn lookup(&self, term: &Term) -> Option<u32> {
        self.term_to_id.get(term).copied()
    }

    pub fn decode(&self, id: u32) -> Option<&Term> {
        self.id_to_term.get(&id)
    }

    pub fn encode_triple(&mut self, triple: &Triple) -> EncodedTriple {
        let subject: Term = triple.subject.clone().into();
        let predicate = Term::Iri(triple.predicate.clone());
        EncodedTriple {
            subject: self.encode(&subject),
            predicate: self.encode(&predicate),
            object: self.encode(&triple.object),
        }
    }

    /// Encoded form of a triple whose terms are all interned already;
    /// `None` means the triple cannot be in any structure fed from this
    /// dictionary.
    pub fn lookup_triple(&self, triple: &Triple) -> Option<EncodedTriple> {
        let subject: Term = triple.subject.clone().into();
        let predicate = Term::Iri(triple.predicate.clone());
        Some(EncodedTriple {
            subject: self.lookup(&subject)?,
            predicate: self.lookup(&predicate)?,
            object: self.lookup(&triple.object)?,
        })
    }

    pub fn decode_triple(&self, triple: &EncodedTriple) -> Option<Triple> {
        let subject = match self.decode(triple.subject)? {
            Term::Iri(iri) => Subject::Iri(iri.clone()),
            Term::BlankNode(blank) => Subject::BlankNode(blank.clone()),
            Term::Literal(_) => return None,
        };
        let predicate = match self.decode(triple.predicate)? {
            Term::Iri(iri) => iri.clone(),
            _ => return None,
        };
        let object = self.decode(triple.object)?.clone();
        Some(Triple {
            subject,
            predicate,
            object,
        })
    }
}
