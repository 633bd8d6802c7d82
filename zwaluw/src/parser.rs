use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0, multispace1, space0, space1},
    combinator::{opt, peek, recognize},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded, terminated, tuple},
    IResult, Parser,
};
use shared::vocab;
use std::collections::HashMap;

// Helper function to recognize identifiers
pub fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

// Prefixed name like foaf:name, split at the colon; ":name" belongs to the
// default namespace
pub fn prefixed_name(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, prefix) = opt(identifier)(input)?;
    let (input, _) = char(':')(input)?;
    let (input, local) = identifier(input)?;
    Ok((input, (prefix.unwrap_or(""), local)))
}

// Parser for variables (e.g., ?person)
pub fn variable(input: &str) -> IResult<&str, &str> {
    recognize(tuple((char('?'), identifier)))(input)
}

// Parser for an IRI within angle brackets
pub fn iri_ref(input: &str) -> IResult<&str, &str> {
    delimited(char('<'), take_while1(|c| c != '>'), char('>'))(input)
}

// Blank node label like _:b0 or _:genid-0; '-' is a label character here,
// unlike in identifiers
pub fn blank_node_label(input: &str) -> IResult<&str, &str> {
    preceded(
        tag("_:"),
        take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-'),
    )(input)
}

// Double-quoted string with \" \\ \n \r \t escapes decoded
pub fn string_literal(input: &str) -> IResult<&str, String> {
    let mut chars = input.char_indices();
    match chars.next() {
        Some((_, '"')) => {}
        _ => {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Char,
            )))
        }
    }

    let mut value = String::new();
    let mut escaped = false;
    for (idx, c) in chars {
        if escaped {
            value.push(match c {
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                other => other,
            });
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return Ok((&input[idx + 1..], value));
        } else {
            value.push(c);
        }
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

// Language tag after '@'
pub fn language_tag(input: &str) -> IResult<&str, &str> {
    preceded(
        char('@'),
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-'),
    )(input)
}

/// An IRI reference that still needs prefix resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnresolvedIri<'a> {
    Full(&'a str),
    Prefixed(&'a str, &'a str),
}

/// A term as written in a document or query, before prefixes are resolved.
/// Variable names are kept without their `?` marker.
#[derive(Debug, Clone, PartialEq)]
pub enum UnresolvedTerm<'a> {
    Variable(&'a str),
    Iri(UnresolvedIri<'a>),
    Blank(&'a str),
    Literal {
        lexical: String,
        language: Option<&'a str>,
        datatype: Option<UnresolvedIri<'a>>,
    },
}

pub type UnresolvedTriple<'a> = (UnresolvedTerm<'a>, UnresolvedTerm<'a>, UnresolvedTerm<'a>);

pub fn unresolved_iri(input: &str) -> IResult<&str, UnresolvedIri<'_>> {
    alt((
        iri_ref.map(UnresolvedIri::Full),
        prefixed_name.map(|(prefix, local)| UnresolvedIri::Prefixed(prefix, local)),
    ))(input)
}

// Bare 'a' abbreviates rdf:type; whitespace has to follow so that prefixed
// names starting with 'a' are not cut short
fn a_keyword(input: &str) -> IResult<&str, UnresolvedTerm<'_>> {
    let (input, _) = terminated(tag("a"), peek(multispace1))(input)?;
    Ok((
        input,
        UnresolvedTerm::Iri(UnresolvedIri::Full(vocab::RDF_TYPE)),
    ))
}

// Literal with optional language tag or datatype annotation
pub fn literal_term(input: &str) -> IResult<&str, UnresolvedTerm<'_>> {
    let (input, lexical) = string_literal(input)?;
    let (input, language) = opt(language_tag)(input)?;
    if language.is_some() {
        return Ok((
            input,
            UnresolvedTerm::Literal {
                lexical,
                language,
                datatype: None,
            },
        ));
    }
    let (input, datatype) = opt(preceded(tag("^^"), unresolved_iri))(input)?;
    Ok((
        input,
        UnresolvedTerm::Literal {
            lexical,
            language: None,
            datatype,
        },
    ))
}

// ---- term parsers for data documents (variables are not allowed) ----

pub fn data_subject(input: &str) -> IResult<&str, UnresolvedTerm<'_>> {
    alt((
        blank_node_label.map(UnresolvedTerm::Blank),
        unresolved_iri.map(UnresolvedTerm::Iri),
    ))(input)
}

pub fn data_predicate(input: &str) -> IResult<&str, UnresolvedTerm<'_>> {
    alt((unresolved_iri.map(UnresolvedTerm::Iri), a_keyword))(input)
}

pub fn data_object(input: &str) -> IResult<&str, UnresolvedTerm<'_>> {
    alt((
        blank_node_label.map(UnresolvedTerm::Blank),
        unresolved_iri.map(UnresolvedTerm::Iri),
        literal_term,
    ))(input)
}

// ---- term parsers for query patterns ----

pub fn query_subject(input: &str) -> IResult<&str, UnresolvedTerm<'_>> {
    alt((
        variable.map(|v| UnresolvedTerm::Variable(&v[1..])),
        blank_node_label.map(UnresolvedTerm::Blank),
        unresolved_iri.map(UnresolvedTerm::Iri),
    ))(input)
}

pub fn query_predicate(input: &str) -> IResult<&str, UnresolvedTerm<'_>> {
    alt((
        variable.map(|v| UnresolvedTerm::Variable(&v[1..])),
        unresolved_iri.map(UnresolvedTerm::Iri),
        a_keyword,
    ))(input)
}

pub fn query_object(input: &str) -> IResult<&str, UnresolvedTerm<'_>> {
    alt((
        variable.map(|v| UnresolvedTerm::Variable(&v[1..])),
        blank_node_label.map(UnresolvedTerm::Blank),
        unresolved_iri.map(UnresolvedTerm::Iri),
        literal_term,
    ))(input)
}

// One predicate with its comma-separated objects
pub fn parse_predicate_object(
    input: &str,
) -> IResult<&str, Vec<(UnresolvedTerm<'_>, UnresolvedTerm<'_>)>> {
    let (input, predicate) = query_predicate(input)?;
    let (input, _) = multispace1(input)?;
    let (input, objects) = separated_list1(
        tuple((multispace0, char(','), multispace0)),
        query_object,
    )(input)?;
    Ok((
        input,
        objects
            .into_iter()
            .map(|object| (predicate.clone(), object))
            .collect(),
    ))
}

// A subject with one or more ';'-separated predicate-object groups
pub fn parse_triple_block(input: &str) -> IResult<&str, Vec<UnresolvedTriple<'_>>> {
    let (input, subject) = query_subject(input)?;
    let (input, _) = multispace1(input)?;

    // First predicate-object group
    let (input, first_group) = parse_predicate_object(input)?;

    // Additional groups separated by semicolons
    let (input, rest_groups) = many0(preceded(
        tuple((multispace0, char(';'), multispace0)),
        parse_predicate_object,
    ))(input)?;

    let mut triples = Vec::new();
    for (predicate, object) in first_group
        .into_iter()
        .chain(rest_groups.into_iter().flatten())
    {
        triples.push((subject.clone(), predicate, object));
    }
    Ok((input, triples))
}

// Parser for PREFIX declarations
pub fn parse_prefix(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, _) = multispace0(input)?;
    let (input, _) = tag("PREFIX")(input)?;
    let (input, _) = space1(input)?;
    let (input, prefix) = opt(identifier)(input)?;
    let (input, _) = char(':')(input)?;
    let (input, _) = space0(input)?;
    let (input, uri) = iri_ref(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, (prefix.unwrap_or(""), uri)))
}

/// Projection of a SELECT query: explicit variables or `*`.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection<'a> {
    Star,
    Variables(Vec<&'a str>),
}

// Parser for the SELECT clause
pub fn parse_select(input: &str) -> IResult<&str, Projection<'_>> {
    let (input, _) = tag("SELECT")(input)?;
    let (input, _) = space1(input)?;

    // '*' projects every variable the patterns mention
    if let Ok((input, _)) = tag::<_, _, nom::error::Error<_>>("*")(input) {
        return Ok((input, Projection::Star));
    }

    let (input, variables) = separated_list1(space1, variable)(input)?;
    Ok((
        input,
        Projection::Variables(variables.into_iter().map(|v| &v[1..]).collect()),
    ))
}

// Parser for the WHERE clause
pub fn parse_where(input: &str) -> IResult<&str, Vec<UnresolvedTriple<'_>>> {
    let (input, _) = multispace0(input)?;
    let (input, _) = tag("WHERE")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('{')(input)?;

    let mut patterns = Vec::new();
    let mut current_input = input;

    // Triple blocks until the closing brace
    loop {
        let (new_input, _) = multispace0(current_input)?;
        current_input = new_input;

        if let Ok((new_input, _)) = char::<_, nom::error::Error<_>>('}')(current_input) {
            current_input = new_input;
            break;
        }

        let (new_input, block) = parse_triple_block(current_input)?;
        patterns.extend(block);
        current_input = new_input;

        // Consume a trailing dot
        if let Ok((new_input, _)) = tuple((
            space0::<&str, nom::error::Error<&str>>,
            char('.'),
            space0,
        ))(current_input)
        {
            current_input = new_input;
        }
    }

    Ok((current_input, patterns))
}

/// A parsed SELECT query, prefixes still unresolved against the store.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery<'a> {
    pub prefixes: HashMap<String, String>,
    pub projection: Projection<'a>,
    pub patterns: Vec<UnresolvedTriple<'a>>,
}

// Parser for a complete SELECT query
pub fn parse_select_query(input: &str) -> IResult<&str, SelectQuery<'_>> {
    let mut prefixes = HashMap::new();
    let mut current_input = input;

    // Zero or more PREFIX declarations
    loop {
        let original_input = current_input;
        match parse_prefix(current_input) {
            Ok((new_input, (prefix, uri))) => {
                prefixes.insert(prefix.to_string(), uri.to_string());
                current_input = new_input;
            }
            Err(_) => {
                current_input = original_input;
                break;
            }
        }
    }

    let (input, _) = multispace0(current_input)?;
    let (input, projection) = parse_select(input)?;
    let (input, patterns) = parse_where(input)?;
    let (input, _) = multispace0(input)?;

    Ok((
        input,
        SelectQuery {
            prefixes,
            projection,
            patterns,
        },
    ))
}
