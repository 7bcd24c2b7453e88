//! Tallies derived from the stored `vote_count` counters. Reads stay
//! O(options); the vote ledger keeps the counters in step with the
//! vote rows, so nothing here rescans votes.

use serde::Serialize;

use crate::models::poll_option::PollOption;

/// One option with its share of the question's votes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionTally {
    pub id: i64,
    pub text: String,
    pub vote_count: i64,
    pub percentage: f64,
    pub leading: bool,
}

/// Sum of the stored counters over one question's options.
pub fn question_total(options: &[PollOption]) -> i64 {
    options.iter().map(|o| o.vote_count).sum()
}

/// Share of the question total as a percentage, 0 when nobody has
/// voted yet.
pub fn percentage(vote_count: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        vote_count as f64 / total as f64 * 100.0
    }
}

/// Index of the leading option: highest counter, earliest stored
/// position winning ties.
pub fn leading_index(options: &[PollOption]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, option) in options.iter().enumerate() {
        let better = match best {
            Some(b) => option.vote_count > options[b].vote_count,
            None => true,
        };
        if better {
            best = Some(idx);
        }
    }
    best
}

/// Per-option tallies for one question, in stored option order.
pub fn build(options: &[PollOption]) -> Vec<OptionTally> {
    let total = question_total(options);
    let leading = leading_index(options);
    options
        .iter()
        .enumerate()
        .map(|(idx, option)| OptionTally {
            id: option.id,
            text: option.text.clone(),
            vote_count: option.vote_count,
            percentage: percentage(option.vote_count, total),
            leading: leading == Some(idx),
        })
        .collect()
}
