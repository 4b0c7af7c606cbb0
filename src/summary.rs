use std::cmp::Ordering;
use std::collections::HashMap;

use crate::participants::Participant;
use crate::ratings::RatingEntry;

/// sort key for participants without ratings, below every possible rating
const NOT_AVAILABLE: f64 = -1.0;

/// The ratings a participant received.
///
/// `mean` and `median` are `None` (serialized as `null`) when nobody rated
/// the participant yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantSummary {
    pub name: String,
    pub self_rating: Option<u8>,
    pub num_ratings: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Summarize the ratings received by every participant.
///
/// Ratings that aren't on the rating scale are ignored. The result is sorted
/// by mean rating, highest first, with unrated participants last.
pub fn summarize(participants: &[Participant], ratings: &[RatingEntry]) -> Vec<ParticipantSummary> {
    let mut received: HashMap<&str, Vec<u8>> = HashMap::new();

    for entry in ratings {
        if let Some(rating) = entry.valid_rating() {
            received
                .entry(entry.rated_player.as_str())
                .or_default()
                .push(rating);
        }
    }

    let mut summary: Vec<ParticipantSummary> = participants
        .iter()
        .map(|participant| {
            let values = received
                .get(participant.name.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            ParticipantSummary {
                name: participant.name.clone(),
                self_rating: participant.self_rating,
                num_ratings: values.len(),
                mean: mean(values).map(round),
                median: median(values).map(round),
            }
        })
        .collect();

    summary.sort_by(|a, b| {
        let a = a.mean.unwrap_or(NOT_AVAILABLE);
        let b = b.mean.unwrap_or(NOT_AVAILABLE);
        b.partial_cmp(&a).unwrap_or(Ordering::Equal)
    });

    summary
}

/// number of rating rows received per participant, valid or not
pub fn rating_counts(ratings: &[RatingEntry]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for entry in ratings {
        *counts.entry(entry.rated_player.as_str()).or_insert(0) += 1;
    }
    counts
}

fn mean(values: &[u8]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let total: u32 = values.iter().map(|v| u32::from(*v)).sum();
    Some(f64::from(total) / values.len() as f64)
}

fn median(values: &[u8]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let middle = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((f64::from(sorted[middle - 1]) + f64::from(sorted[middle])) / 2.0)
    } else {
        Some(f64::from(sorted[middle]))
    }
}

/// round to two decimals, exact halves go to the even neighbour
pub fn round(value: f64) -> f64 {
    let scaled = value * 100.0;
    let mut rounded = scaled.round();
    if (rounded - scaled).abs() == 0.5 && rounded % 2.0 != 0.0 {
        rounded -= scaled.signum();
    }
    rounded / 100.0
}
