//! Answer-key loading.
//!
//! The file is a sequence of four-line blocks:
//!
//! ```text
//! CATEGORY
//! clue text
//! answer one | answer two
//! <blank>
//! ```
//!
//! The query for a block is `"<clue> <category>"`.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKey {
    entries: Vec<(String, Vec<String>)>,
    lookup: HashMap<String, usize>,
}

impl AnswerKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the accepted answers for `query`. A replaced query
    /// keeps its original position.
    pub fn insert(&mut self, query: impl Into<String>, answers: Vec<String>) {
        let query = query.into();
        match self.lookup.get(&query) {
            Some(&i) => self.entries[i].1 = answers,
            None => {
                self.lookup.insert(query.clone(), self.entries.len());
                self.entries.push((query, answers));
            }
        }
    }

    pub fn accepted(&self, query: &str) -> Option<&[String]> {
        self.lookup.get(query).map(|&i| self.entries[i].1.as_slice())
    }

    /// Queries in file order.
    pub fn queries(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(q, _)| q.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .map_err(|e| Error::Configuration(format!("cannot open answer key {}: {e}", path.display())))?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut key = AnswerKey::new();
        let mut category = String::new();
        let mut query = String::new();
        let mut position = 0;
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            position += 1;
            match position {
                1 => category = line.to_string(),
                2 => query = format!("{line} {category}").trim().to_string(),
                3 => {
                    let answers = line.split('|').map(str::trim).filter(|a| !a.is_empty()).map(String::from).collect();
                    key.insert(std::mem::take(&mut query), answers);
                }
                _ => {
                    if !line.is_empty() {
                        return Err(Error::Configuration(format!(
                            "answer key line {}: expected a blank separator, found {line:?}",
                            i + 1
                        )));
                    }
                    position = 0;
                }
            }
        }
        if matches!(position, 1 | 2) {
            tracing::warn!(lines = position, "dropping incomplete trailing answer-key block");
        }
        tracing::debug!(entries = key.len(), "answer key loaded");
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "CAPITALS\nCity of light\nParis | paris, france\n\nRIVERS\nFlows through London\nThames\n";

    #[test]
    fn parses_blocks_in_order() {
        let key = AnswerKey::parse(SAMPLE).unwrap();
        assert_eq!(key.len(), 2);
        let queries: Vec<&str> = key.queries().collect();
        assert_eq!(queries, vec!["City of light CAPITALS", "Flows through London RIVERS"]);
        assert_eq!(key.accepted("City of light CAPITALS").unwrap(), &["Paris".to_string(), "paris, france".to_string()]);
        assert_eq!(key.accepted("Flows through London RIVERS").unwrap(), &["Thames".to_string()]);
    }

    #[test]
    fn non_blank_separator_is_fatal() {
        let err = AnswerKey::parse("CAT\nclue\nanswer\nnot blank\n").unwrap_err();
        assert!(matches!(err, Error::Configuration(ref m) if m.contains("line 4")));
    }

    #[test]
    fn incomplete_trailing_block_is_dropped() {
        let key = AnswerKey::parse("CAT\nclue\nanswer\n\nDANGLING\n").unwrap();
        assert_eq!(key.len(), 1);
    }
}
