//! Title-delimited corpus records.
//!
//! A record starts at a title line `[[Some Title]]` and runs until the next
//! title line or the end of input. Lines before the first title are dropped.

use std::io::{self, BufRead, Lines};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub title: String,
    pub lines: Vec<String>,
}

/// A line is a title iff it is at least four bytes long, is wrapped in `[[ ]]`
/// and contains no `|` (which marks a link with display text).
pub fn is_title(line: &str) -> bool {
    line.len() >= 4 && line.starts_with("[[") && line.ends_with("]]") && !line.contains('|')
}

/// Strip the bracket delimiters from a line accepted by [`is_title`].
pub fn title_of(line: &str) -> &str {
    &line[2..line.len() - 2]
}

/// Lazily split a line source into records.
pub fn records<R: BufRead>(reader: R) -> Records<R> {
    Records { lines: reader.lines(), current: None, buffer: Vec::new() }
}

pub struct Records<R> {
    lines: Lines<R>,
    current: Option<String>,
    buffer: Vec<String>,
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = io::Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.lines.next() {
                Some(Ok(line)) => {
                    let line = line.trim();
                    if is_title(line) {
                        let previous = self.current.replace(title_of(line).to_string());
                        let lines = std::mem::take(&mut self.buffer);
                        match previous {
                            Some(title) if !title.is_empty() => {
                                return Some(Ok(RawRecord { title, lines }));
                            }
                            _ => {}
                        }
                    } else if self.current.is_some() {
                        self.buffer.push(line.to_string());
                    }
                }
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    let title = self.current.take()?;
                    let lines = std::mem::take(&mut self.buffer);
                    if title.is_empty() {
                        return None;
                    }
                    return Some(Ok(RawRecord { title, lines }));
                }
            }
        }
    }
}
