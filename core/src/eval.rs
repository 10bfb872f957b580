use crate::answers::AnswerKey;
use crate::error::{Error, Result};
use crate::rank::ScoredResult;
use serde::Serialize;

/// Deepest rank inspected when the top answer is wrong.
pub const RECOVERY_DEPTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Correct,
    /// Wrong at rank 1, but the 1-based rank given here (2..=10) matched.
    RecoveredAt(usize),
    Missed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvalSummary {
    pub correct: usize,
    pub recoverable_in_top10: usize,
    pub total: usize,
    pub verdicts: Vec<Verdict>,
}

impl EvalSummary {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

pub fn is_correct(title: &str, accepted: &[String]) -> bool {
    let title = title.to_lowercase();
    accepted.iter().any(|a| a.to_lowercase() == title)
}

pub fn judge(results: &[ScoredResult], accepted: &[String]) -> Verdict {
    match results.first() {
        Some(top) if is_correct(&top.title, accepted) => Verdict::Correct,
        _ => results
            .iter()
            .enumerate()
            .take(RECOVERY_DEPTH)
            .skip(1)
            .find(|(_, r)| is_correct(&r.title, accepted))
            .map_or(Verdict::Missed, |(i, _)| Verdict::RecoveredAt(i + 1)),
    }
}

/// Judge each `(original query, results)` pair against `key`.
///
/// A query missing from the key is a configuration error.
pub fn evaluate<'a, I>(outcomes: I, key: &AnswerKey) -> Result<EvalSummary>
where
    I: IntoIterator<Item = (&'a str, &'a [ScoredResult])>,
{
    let mut summary = EvalSummary::default();
    for (query, results) in outcomes {
        let accepted = key
            .accepted(query)
            .ok_or_else(|| Error::Configuration(format!("no answer key entry for query {query:?}")))?;
        let verdict = judge(results, accepted);
        match verdict {
            Verdict::Correct => summary.correct += 1,
            Verdict::RecoveredAt(_) => summary.recoverable_in_top10 += 1,
            Verdict::Missed => {}
        }
        summary.total += 1;
        summary.verdicts.push(verdict);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(titles: &[&str]) -> Vec<ScoredResult> {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| ScoredResult { doc_id: i as u32, title: t.to_string(), score: 10.0 - i as f32 })
            .collect()
    }

    fn answers(a: &[&str]) -> Vec<String> {
        a.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn top_hit_matches_case_insensitively() {
        assert_eq!(judge(&results(&["PARIS", "London"]), &answers(&["paris"])), Verdict::Correct);
    }

    #[test]
    fn recovery_reports_first_matching_rank() {
        let r = results(&["A", "B", "C", "London", "London"]);
        assert_eq!(judge(&r, &answers(&["london"])), Verdict::RecoveredAt(4));
    }

    #[test]
    fn recovery_stops_at_rank_ten() {
        let mut titles = vec!["x"; 10];
        titles.push("hit");
        assert_eq!(judge(&results(&titles), &answers(&["hit"])), Verdict::Missed);
        titles[9] = "hit";
        assert_eq!(judge(&results(&titles), &answers(&["hit"])), Verdict::RecoveredAt(10));
    }

    #[test]
    fn empty_results_are_missed() {
        assert_eq!(judge(&[], &answers(&["x"])), Verdict::Missed);
    }

    #[test]
    fn missing_key_entry_fails() {
        let key = AnswerKey::new();
        let r = results(&["A"]);
        let err = evaluate([("unknown", r.as_slice())], &key).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn aggregates_counts() {
        let mut key = AnswerKey::new();
        key.insert("q1", answers(&["A"]));
        key.insert("q2", answers(&["C"]));
        key.insert("q3", answers(&["Z"]));
        let (r1, r2, r3) = (results(&["A", "B"]), results(&["B", "C"]), results(&["B"]));
        let summary = evaluate(
            [("q1", r1.as_slice()), ("q2", r2.as_slice()), ("q3", r3.as_slice())],
            &key,
        )
        .unwrap();
        assert_eq!((summary.correct, summary.recoverable_in_top10, summary.total), (1, 1, 3));
        assert_eq!(summary.verdicts, vec![Verdict::Correct, Verdict::RecoveredAt(2), Verdict::Missed]);
        assert!((summary.accuracy() - 1.0 / 3.0).abs() < 1e-9);
    }
}
