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
    use zwaluw::error::format_query_error;
    use zwaluw::parser::*;

    #[test]
    fn test_identifier_parsing() {
        let result = identifier("person_name");
        assert_eq!(result, Ok(("", "person_name")));

        // Empty string should fail
        let result = identifier("");
        assert!(result.is_err());

        // Special characters should fail
        let result = identifier("!invalid");
        assert!(result.is_err());
    }

    #[test]
    fn test_variable_parsing() {
        let result = variable("?person");
        assert_eq!(result, Ok(("", "?person")));

        let result = variable("invalid");
        assert!(result.is_err());
    }

    #[test]
    fn test_prefixed_name_parsing() {
        let result = prefixed_name("foaf:name");
        assert_eq!(result, Ok(("", ("foaf", "name"))));

        // Default namespace
        let result = prefixed_name(":name");
        assert_eq!(result, Ok(("", ("", "name"))));

        // No colon at all
        let result = prefixed_name("name");
        assert!(result.is_err());
    }

    #[test]
    fn test_iri_ref_parsing() {
        let result = iri_ref("<http://example.org/worksAt>");
        assert_eq!(result, Ok(("", "http://example.org/worksAt")));

        let result = iri_ref("http://example.org/worksAt");
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_node_label_parsing() {
        let result = blank_node_label("_:b0");
        assert_eq!(result, Ok(("", "b0")));

        // Hyphens are label characters
        let result = blank_node_label("_:genid-0 .");
        assert_eq!(result, Ok((" .", "genid-0")));

        let result = blank_node_label(":b0");
        assert!(result.is_err());
    }

    #[test]
    fn test_string_literal_escapes() {
        let result = string_literal(r#""plain""#);
        assert_eq!(result, Ok(("", "plain".to_string())));

        let result = string_literal(r#""he said \"hi\"""#);
        assert_eq!(result, Ok(("", "he said \"hi\"".to_string())));

        let result = string_literal(r#""line\nbreak""#);
        assert_eq!(result, Ok(("", "line\nbreak".to_string())));

        let result = string_literal(r#""back\\slash""#);
        assert_eq!(result, Ok(("", "back\\slash".to_string())));

        // Unterminated literal should fail
        let result = string_literal("\"open");
        assert!(result.is_err());
    }

    #[test]
    fn test_literal_with_language() {
        let result = literal_term("\"Tim\"@en");
        assert_eq!(
            result,
            Ok((
                "",
                UnresolvedTerm::Literal {
                    lexical: "Tim".to_string(),
                    language: Some("en"),
                    datatype: None,
                }
            ))
        );

        let result = literal_term("\"colour\"@en-GB");
        assert_eq!(
            result,
            Ok((
                "",
                UnresolvedTerm::Literal {
                    lexical: "colour".to_string(),
                    language: Some("en-GB"),
                    datatype: None,
                }
            ))
        );
    }

    #[test]
    fn test_literal_with_datatype() {
        let result = literal_term("\"5\"^^xsd:integer");
        assert_eq!(
            result,
            Ok((
                "",
                UnresolvedTerm::Literal {
                    lexical: "5".to_string(),
                    language: None,
                    datatype: Some(UnresolvedIri::Prefixed("xsd", "integer")),
                }
            ))
        );

        let result = literal_term("\"5\"^^<http://www.w3.org/2001/XMLSchema#integer>");
        assert_eq!(
            result,
            Ok((
                "",
                UnresolvedTerm::Literal {
                    lexical: "5".to_string(),
                    language: None,
                    datatype: Some(UnresolvedIri::Full(
                        "http://www.w3.org/2001/XMLSchema#integer"
                    )),
                }
            ))
        );
    }

    #[test]
    fn test_predicate_parsing() {
        // Prefixed predicate
        let result = query_predicate("foaf:knows ");
        assert_eq!(
            result,
            Ok((" ", UnresolvedTerm::Iri(UnresolvedIri::Prefixed("foaf", "knows"))))
        );

        // 'a' abbreviates rdf:type
        let result = query_predicate("a foaf:Person");
        assert_eq!(
            result,
            Ok((
                " foaf:Person",
                UnresolvedTerm::Iri(UnresolvedIri::Full(
                    "http://www.w3.org/1999/02/22-rdf-syntax-ns#type"
                ))
            ))
        );

        // Variable as predicate
        let result = query_predicate("?relation ");
        assert_eq!(result, Ok((" ", UnresolvedTerm::Variable("relation"))));
    }

    #[test]
    fn test_parse_prefix_declaration() {
        let result = parse_prefix("PREFIX foaf: <http://xmlns.com/foaf/0.1/>");
        assert_eq!(result, Ok(("", ("foaf", "http://xmlns.com/foaf/0.1/"))));

        // Default namespace declaration
        let result = parse_prefix("PREFIX : <http://example.org/>");
        assert_eq!(result, Ok(("", ("", "http://example.org/"))));
    }

    #[test]
    fn test_parse_select_variables() {
        let result = parse_select("SELECT ?person ?name ");
        assert_eq!(
            result,
            Ok((" ", Projection::Variables(vec!["person", "name"])))
        );
    }

    #[test]
    fn test_parse_select_star() {
        let result = parse_select("SELECT * WHERE");
        assert_eq!(result, Ok((" WHERE", Projection::Star)));
    }

    #[test]
    fn test_parse_triple_block_with_semicolons() {
        let (rest, triples) =
            parse_triple_block("?p foaf:name ?name ; foaf:mbox ?mbox").unwrap();
        assert_eq!(rest, "");
        assert_eq!(triples.len(), 2);
        assert_eq!(triples[0].0, UnresolvedTerm::Variable("p"));
        assert_eq!(triples[1].0, UnresolvedTerm::Variable("p"));
        assert_eq!(
            triples[1].1,
            UnresolvedTerm::Iri(UnresolvedIri::Prefixed("foaf", "mbox"))
        );
    }

    #[test]
    fn test_parse_triple_block_with_object_list() {
        let (rest, triples) = parse_triple_block("?p foaf:knows ?a , ?b").unwrap();
        assert_eq!(rest, "");
        assert_eq!(triples.len(), 2);
        assert_eq!(triples[0].2, UnresolvedTerm::Variable("a"));
        assert_eq!(triples[1].2, UnresolvedTerm::Variable("b"));
    }

    #[test]
    fn test_parse_full_select_query() {
        let query = r#"PREFIX foaf: <http://xmlns.com/foaf/0.1/>
SELECT ?name
WHERE {
    ?p a foaf:Person .
    ?p foaf:name ?name .
}"#;
        let (rest, parsed) = parse_select_query(query).unwrap();
        assert_eq!(rest, "");
        assert_eq!(
            parsed.prefixes.get("foaf"),
            Some(&"http://xmlns.com/foaf/0.1/".to_string())
        );
        assert_eq!(parsed.projection, Projection::Variables(vec!["name"]));
        assert_eq!(parsed.patterns.len(), 2);
    }

    #[test]
    fn test_select_missing_where_message() {
        let query = "SELECT ?name { ?p foaf:name ?name }";
        let err = parse_select_query(query).unwrap_err();
        let message = format_query_error(query, err);
        assert!(message.contains("no corresponding 'WHERE'"));
    }

    #[test]
    fn test_mismatched_braces_message() {
        let query = "SELECT ?name WHERE { ?p foaf:name ?name .";
        let err = parse_select_query(query).unwrap_err();
        let message = format_query_error(query, err);
        assert!(message.contains("Mismatched braces"));
    }
}
