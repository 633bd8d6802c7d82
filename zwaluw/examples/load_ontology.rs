extern crate zwaluw;
use zwaluw::store::{Syntax, TripleStore};

fn main() {
    // A small food ontology in RDF/XML
    let rdf_xml = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#"
         xmlns:food="http://example.org/food#">
  <owl:Class rdf:about="http://example.org/food#Dish"/>
  <owl:Class rdf:about="http://example.org/food#Stoofvlees">
    <rdfs:subClassOf rdf:resource="http://example.org/food#Dish"/>
    <rdfs:label xml:lang="nl">stoofvlees met frieten</rdfs:label>
  </owl:Class>
  <owl:Class rdf:about="http://example.org/food#Waterzooi">
    <rdfs:subClassOf rdf:resource="http://example.org/food#Dish"/>
    <rdfs:label xml:lang="nl">Gentse waterzooi</rdfs:label>
  </owl:Class>
</rdf:RDF>
"#;

    let store = TripleStore::parse_str(rdf_xml, Syntax::RdfXml).expect("ontology parses");

    println!("Loaded {} triples:", store.len());
    for triple in store.iter() {
        println!("  {}", triple);
    }

    // The xmlns declarations came along as prefix bindings, so the Turtle
    // serialization abbreviates everything
    println!("\nAs Turtle:\n{}", store.serialize(Syntax::Turtle));
}
