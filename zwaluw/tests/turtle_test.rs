/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

#[cfg(test)]
mod tests {
    use shared::term::{BlankNode, Iri, Literal, Term};
    use shared::triple::Triple;
    use shared::vocab;
    use zwaluw::error::RdfError;
    use zwaluw::store::{Syntax, TripleStore};

    fn ex(local: &str) -> Iri {
        Iri::new(format!("http://example.org/{}", local))
    }

    fn foaf(local: &str) -> Iri {
        Iri::new(format!("{}{}", vocab::FOAF_NS, local))
    }

    fn sorted_triples(store: &TripleStore) -> Vec<Triple> {
        let mut triples: Vec<Triple> = store.iter().collect();
        triples.sort();
        triples
    }

    #[test]
    fn test_parse_simple_document() {
        let doc = r#"
            @prefix ex: <http://example.org/> .
            @prefix foaf: <http://xmlns.com/foaf/0.1/> .

            ex:tim a foaf:Person .
            ex:tim foaf:name "Tim" .
        "#;
        let store = TripleStore::parse_str(doc, Syntax::Turtle).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.contains(&Triple::new(
            ex("tim"),
            Iri::new(vocab::RDF_TYPE),
            Term::Iri(foaf("Person")),
        )));
        assert!(store.contains(&Triple::new(
            ex("tim"),
            foaf("name"),
            Term::Literal(Literal::simple("Tim")),
        )));
        assert_eq!(store.namespace("ex"), Some("http://example.org/"));
        assert_eq!(store.namespace("foaf"), Some(vocab::FOAF_NS));
    }

    #[test]
    fn test_parse_semicolons_and_commas() {
        let doc = r#"
            @prefix ex: <http://example.org/> .
            ex:tim ex:nick "Timmy", "TimBL" ;
                ex:age "70" .
        "#;
        let store = TripleStore::parse_str(doc, Syntax::Turtle).unwrap();
        assert_eq!(store.len(), 3);
        assert!(store.contains(&Triple::new(
            ex("tim"),
            ex("nick"),
            Term::Literal(Literal::simple("TimBL")),
        )));
        assert!(store.contains(&Triple::new(
            ex("tim"),
            ex("age"),
            Term::Literal(Literal::simple("70")),
        )));
    }

    #[test]
    fn test_parse_skips_comments() {
        let doc = "# header comment\n@prefix ex: <http://example.org/> .\n# between\nex:a ex:b ex:c .\n# trailing";
        let store = TripleStore::parse_str(doc, Syntax::Turtle).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_parse_blank_nodes_and_tags() {
        let doc = r#"
            @prefix ex: <http://example.org/> .
            _:b0 ex:says "bonjour"@fr .
            _:b0 ex:count "42"^^<http://www.w3.org/2001/XMLSchema#integer> .
        "#;
        let store = TripleStore::parse_str(doc, Syntax::Turtle).unwrap();
        assert!(store.contains(&Triple::new(
            BlankNode::new("b0"),
            ex("says"),
            Term::Literal(Literal::with_language("bonjour", "fr")),
        )));
        assert!(store.contains(&Triple::new(
            BlankNode::new("b0"),
            ex("count"),
            Term::Literal(Literal::typed(
                "42",
                Iri::new("http://www.w3.org/2001/XMLSchema#integer"),
            )),
        )));
    }

    #[test]
    fn test_hyphenated_blank_labels_round_trip() {
        let mut store = TripleStore::new();
        store.bind("ex", "http://example.org/");
        store.insert(Triple::new(
            ex("tim"),
            ex("address"),
            Term::BlankNode(BlankNode::new("genid-0")),
        ));
        store.insert(Triple::new(
            BlankNode::new("b-1"),
            ex("city"),
            Term::Literal(Literal::simple("Leuven")),
        ));

        let out = store.serialize(Syntax::Turtle);
        assert!(out.contains("_:genid-0"), "{}", out);
        let reloaded = TripleStore::parse_str(&out, Syntax::Turtle).unwrap();
        assert_eq!(sorted_triples(&reloaded), sorted_triples(&store));
    }

    #[test]
    fn test_xsd_string_literals_collapse_to_simple() {
        let doc = r#"
            @prefix ex: <http://example.org/> .
            ex:a ex:label "plain" .
            ex:b ex:label "plain"^^<http://www.w3.org/2001/XMLSchema#string> .
        "#;
        let store = TripleStore::parse_str(doc, Syntax::Turtle).unwrap();
        let a = Triple::new(ex("a"), ex("label"), Term::Literal(Literal::simple("plain")));
        let b = Triple::new(ex("b"), ex("label"), Term::Literal(Literal::simple("plain")));
        assert!(store.contains(&a));
        assert!(store.contains(&b));
    }

    #[test]
    fn test_default_namespace_round_trip() {
        let doc = "@prefix : <http://example.org/> .\n:tim :knows :anna .";
        let store = TripleStore::parse_str(doc, Syntax::Turtle).unwrap();
        assert!(store.contains(&Triple::new(ex("tim"), ex("knows"), Term::Iri(ex("anna")))));

        let out = store.serialize(Syntax::Turtle);
        assert!(out.contains("@prefix : <http://example.org/> ."));
        assert!(out.contains(":tim :knows :anna ."));
    }

    #[test]
    fn test_unknown_prefix_is_a_parse_error() {
        let doc = "@prefix ex: <http://example.org/> .\nex:a nope:b ex:c .";
        match TripleStore::parse_str(doc, Syntax::Turtle) {
            Err(RdfError::Parse(message)) => {
                assert!(message.contains("unknown prefix 'nope:'"), "{}", message)
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_literal_is_a_syntax_error() {
        let doc = "@prefix ex: <http://example.org/> .\nex:a ex:b \"never closed .";
        match TripleStore::parse_str(doc, Syntax::Turtle) {
            Err(RdfError::Parse(message)) => {
                assert!(message.contains("Syntax error"), "{}", message)
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_serialize_exact_output() {
        let mut store = TripleStore::new();
        store.bind("ex", "http://example.org/");
        store.bind("foaf", vocab::FOAF_NS);
        store.insert(Triple::new(
            ex("tim"),
            Iri::new(vocab::RDF_TYPE),
            Term::Iri(foaf("Person")),
        ));
        store.insert(Triple::new(
            ex("tim"),
            foaf("name"),
            Term::Literal(Literal::simple("Tim")),
        ));

        let expected = "@prefix ex: <http://example.org/> .\n\
                        @prefix foaf: <http://xmlns.com/foaf/0.1/> .\n\
                        \n\
                        ex:tim a foaf:Person ;\n    \
                        foaf:name \"Tim\" .\n";
        assert_eq!(store.serialize(Syntax::Turtle), expected);
    }

    #[test]
    fn test_serialize_is_insertion_order_independent() {
        let names = ["anna", "bert", "carl"];
        let mut forward = TripleStore::new();
        let mut backward = TripleStore::new();
        forward.bind("ex", "http://example.org/");
        backward.bind("ex", "http://example.org/");

        for name in names {
            forward.insert(Triple::new(
                ex(name),
                foaf("name"),
                Term::Literal(Literal::simple(name)),
            ));
            forward.insert(Triple::new(
                ex(name),
                Iri::new(vocab::RDF_TYPE),
                Term::Iri(foaf("Person")),
            ));
        }
        for name in names.iter().rev() {
            backward.insert(Triple::new(
                ex(name),
                Iri::new(vocab::RDF_TYPE),
                Term::Iri(foaf("Person")),
            ));
            backward.insert(Triple::new(
                ex(name),
                foaf("name"),
                Term::Literal(Literal::simple(*name)),
            ));
        }

        assert_eq!(
            forward.serialize(Syntax::Turtle),
            backward.serialize(Syntax::Turtle)
        );
    }

    #[test]
    fn test_serialize_falls_back_to_angle_brackets() {
        let mut store = TripleStore::new();
        store.insert(Triple::new(
            ex("tim"),
            foaf("name"),
            Term::Literal(Literal::simple("Tim")),
        ));

        // no prefixes bound, so every IRI stays spelled out
        let out = store.serialize(Syntax::Turtle);
        assert!(out.contains("<http://example.org/tim>"));
        assert!(out.contains("<http://xmlns.com/foaf/0.1/name>"));
    }

    #[test]
    fn test_serialize_empty_store_lists_prefixes_only() {
        let mut store = TripleStore::new();
        store.bind("foaf", vocab::FOAF_NS);
        assert_eq!(
            store.serialize(Syntax::Turtle),
            "@prefix foaf: <http://xmlns.com/foaf/0.1/> .\n"
        );
        assert_eq!(TripleStore::new().serialize(Syntax::Turtle), "");
    }

    #[test]
    fn test_serialize_abbreviates_datatypes() {
        let mut store = TripleStore::new();
        store.bind("ex", "http://example.org/");
        store.bind("xsd", vocab::XSD_NS);
        store.insert(Triple::new(
            ex("tim"),
            ex("age"),
            Term::Literal(Literal::typed("70", Iri::new(format!("{}integer", vocab::XSD_NS)))),
        ));

        let out = store.serialize(Syntax::Turtle);
        assert!(out.contains("\"70\"^^xsd:integer"), "{}", out);
    }

    #[test]
    fn test_round_trip_preserves_the_graph() {
        let mut store = TripleStore::new();
        store.bind("ex", "http://example.org/");
        store.bind("foaf", vocab::FOAF_NS);
        store.insert(Triple::new(
            ex("tim"),
            Iri::new(vocab::RDF_TYPE),
            Term::Iri(foaf("Person")),
        ));
        store.insert(Triple::new(
            ex("tim"),
            foaf("name"),
            Term::Literal(Literal::simple("Tim")),
        ));
        store.insert(Triple::new(
            BlankNode::new("b0"),
            ex("says"),
            Term::Literal(Literal::with_language("bonjour", "fr")),
        ));
        store.insert(Triple::new(
            ex("tim"),
            ex("quote"),
            Term::Literal(Literal::simple("say \"hi\"\nthen\tleave")),
        ));
        store.insert(Triple::new(
            ex("tim"),
            ex("age"),
            Term::Literal(Literal::typed("70", Iri::new(format!("{}integer", vocab::XSD_NS)))),
        ));

        let out = store.serialize(Syntax::Turtle);
        let reloaded = TripleStore::parse_str(&out, Syntax::Turtle).unwrap();
        assert_eq!(sorted_triples(&reloaded), sorted_triples(&store));

        // and the second serialization is byte-identical
        assert_eq!(reloaded.serialize(Syntax::Turtle), out);
    }
}
