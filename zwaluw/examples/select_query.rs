extern crate zwaluw;
use zwaluw::execute_query::execute_select;
use zwaluw::store::{Syntax, TripleStore};

fn main() {
    let turtle_data = r#"
        @prefix ex: <http://example.org/> .
        @prefix foaf: <http://xmlns.com/foaf/0.1/> .

        ex:tim a foaf:Person ;
            foaf:name "Tim" ;
            foaf:knows ex:anna .

        ex:anna a foaf:Person ;
            foaf:name "Anna" .

        ex:sparky foaf:name "Sparky" .
    "#;
    let store = TripleStore::parse_str(turtle_data, Syntax::Turtle).expect("data parses");

    // Names of everyone that is a foaf:Person
    let sparql = r#"
    PREFIX foaf: <http://xmlns.com/foaf/0.1/>
    SELECT ?name
    WHERE {
        ?person a foaf:Person .
        ?person foaf:name ?name .
    }"#;

    let solutions = execute_select(sparql, &store).expect("query runs");
    println!("{} matches:", solutions.len());
    for row in &solutions {
        println!("  name = {}", row["name"]);
    }

    println!("\nAs SPARQL JSON:\n{}", solutions.to_json());
}
