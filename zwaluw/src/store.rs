use log::debug;
use shared::dictionary::TermDictionary;
use shared::triple::{EncodedTriple, Triple};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use crate::error::RdfError;
use crate::rdf_xml;
use crate::turtle;

/// Concrete syntaxes the store can read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Turtle,
    RdfXml,
}

/// In-memory triple store. Terms are interned in a dictionary and triples
/// are kept as id tuples in an ordered set, so a triple is stored once no
/// matter how often it is inserted.
#[derive(Debug, Clone)]
pub struct TripleStore {
    pub(crate) triples: BTreeSet<EncodedTriple>,
    pub(crate) dictionary: TermDictionary,
    pub(crate) prefixes: HashMap<String, String>,
}

impl TripleStore {
    pub fn new() -> Self {
        Self {
            triples: BTreeSet::new(),
            dictionary: TermDictionary::new(),
            prefixes: HashMap::new(),
        }
    }

    /// Parse `data` into a fresh store. On failure nothing is produced, so
    /// there is no partially loaded state to worry about.
    pub fn parse_str(data: &str, syntax: Syntax) -> Result<TripleStore, RdfError> {
        match syntax {
            Syntax::Turtle => turtle::parse_turtle(data),
            Syntax::RdfXml => rdf_xml::parse_rdf_xml(data),
        }
    }

    /// Read `path` and parse its contents as `syntax`.
    pub fn load_file(path: impl AsRef<Path>, syntax: Syntax) -> Result<TripleStore, RdfError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        debug!("loading {} ({} bytes)", path.display(), data.len());
        Self::parse_str(&data, syntax)
    }

    /// Insert a triple. Inserting one that is already present changes
    /// nothing.
    pub fn insert(&mut self, triple: Triple) {
        let encoded = self.dictionary.encode_triple(&triple);
        self.triples.insert(encoded);
    }

    /// Remove a triple; returns whether it was present.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        match self.dictionary.lookup_triple(triple) {
            Some(encoded) => self.triples.remove(&encoded),
            None => false,
        }
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        match self.dictionary.lookup_triple(triple) {
            Some(encoded) => self.triples.contains(&encoded),
            None => false,
        }
    }

    /// Number of distinct triples. Constant time.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// A fresh pass over every triple, decoded on the fly. Each call starts
    /// over from the beginning.
    pub fn iter(&self) -> impl Iterator<Item = Triple> + '_ {
        self.triples
            .iter()
            .filter_map(|encoded| self.dictionary.decode_triple(encoded))
    }

    /// Bind `prefix` to a namespace IRI. Rebinding a prefix overwrites the
    /// earlier namespace; the empty prefix is the default namespace.
    pub fn bind(&mut self, prefix: &str, namespace: &str) {
        self.prefixes
            .insert(prefix.to_string(), namespace.to_string());
    }

    /// Namespace bound to `prefix`, if any.
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|ns| ns.as_str())
    }

    /// Bound (prefix, namespace) pairs, in no particular order.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes
            .iter()
            .map(|(prefix, ns)| (prefix.as_str(), ns.as_str()))
    }

    /// Serialize the whole store. The output is deterministic: prefixes are
    /// sorted by name and triples by the string forms of subject, predicate
    /// and object, independent of insertion order.
    pub fn serialize(&self, syntax: Syntax) -> String {
        match syntax {
            Syntax::Turtle => turtle::write_turtle(self),
            Syntax::RdfXml => rdf_xml::write_rdf_xml(self),
        }
    }
}

impl Default for TripleStore {
    fn default() -> Self {
        Self::new()
    }
}
