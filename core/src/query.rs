//! Term-query syntax over normalized tokens.
//!
//! Terms are disjunctive by default. `a AND b` makes both neighbours required,
//! `OR` between terms is the default made explicit, and `NOT term` excludes
//! documents containing `term`. Operators must be uppercase.

use crate::error::{Error, Result};
use crate::Token;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermQuery {
    /// Distinct positive terms with their query frequency, in first-occurrence order.
    pub terms: Vec<(Token, u32)>,
    /// Positive terms every matching document must contain.
    pub required: Vec<Token>,
    pub excluded: Vec<Token>,
}

impl TermQuery {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    fn require(&mut self, term: &str) {
        if !self.required.iter().any(|t| t == term) {
            self.required.push(term.to_string());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    Start,
    Term,
    Binary,
    Not,
}

pub fn parse(tokens: &[Token]) -> Result<TermQuery> {
    let mut query = TermQuery::default();
    let mut last = Last::Start;
    // last positive term, and whether the next one follows an `AND`
    let mut previous: Option<&str> = None;
    let mut require_next = false;
    for token in tokens {
        match token.as_str() {
            op @ ("AND" | "OR") => {
                if last != Last::Term {
                    return Err(Error::QueryParse(format!("`{op}` must follow a term")));
                }
                if op == "AND" {
                    if let Some(term) = previous {
                        query.require(term);
                    }
                    require_next = true;
                }
                last = Last::Binary;
            }
            "NOT" => {
                if last == Last::Not {
                    return Err(Error::QueryParse("`NOT` must be followed by a term".into()));
                }
                last = Last::Not;
            }
            term => {
                check_term(term)?;
                if last == Last::Not {
                    if !query.excluded.iter().any(|t| t == term) {
                        query.excluded.push(term.to_string());
                    }
                    previous = None;
                } else {
                    match query.terms.iter_mut().find(|(t, _)| t == term) {
                        Some((_, qtf)) => *qtf += 1,
                        None => query.terms.push((term.to_string(), 1)),
                    }
                    if require_next {
                        query.require(term);
                    }
                    previous = Some(term);
                }
                require_next = false;
                last = Last::Term;
            }
        }
    }
    if matches!(last, Last::Binary | Last::Not) {
        return Err(Error::QueryParse("query ends with an operator".into()));
    }
    Ok(query)
}

fn check_term(term: &str) -> Result<()> {
    if term.starts_with('*') || term.starts_with('?') {
        return Err(Error::QueryParse(format!("leading wildcard in `{term}`")));
    }
    let count = |c: char| term.chars().filter(|&x| x == c).count();
    let balanced = count('"') % 2 == 0 && count('(') == count(')') && count('[') == count(']') && count('{') == count('}');
    if !balanced {
        return Err(Error::QueryParse(format!("unbalanced delimiters in `{term}`")));
    }
    Ok(())
}
