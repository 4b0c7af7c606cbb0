//! Rating intake: a participant rates themself and up to five peers.
//!
//! The peers offered to a submitter are the participants who received the
//! fewest ratings so far, so exposure drifts towards the under-rated.
use crate::errors::ServiceError;
use crate::participants::Participant;
use crate::ratings::RatingEntry;
use crate::store::{canonical_name, Table};
use crate::summary;
use crate::validator::{self, Validate};

pub mod routes;

/// how many peers a submitter gets to rate
pub const CANDIDATE_COUNT: usize = 5;

/// The peers `rater` should rate: the least rated participants first,
/// ties in participant file order.
pub fn select_candidates(
    rater: &str,
    participants: &[Participant],
    ratings: &[RatingEntry],
) -> Vec<String> {
    let rater = canonical_name(rater);
    let counts = summary::rating_counts(ratings);

    let mut pool: Vec<(&str, usize)> = participants
        .iter()
        .filter(|participant| participant.name != rater)
        .map(|participant| {
            let name = participant.name.as_str();
            (name, counts.get(name).copied().unwrap_or(0))
        })
        .collect();

    pool.sort_by_key(|(_, count)| *count);

    pool.into_iter()
        .take(CANDIDATE_COUNT)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[derive(Debug, Serialize)]
pub struct Candidates {
    pub rater: String,
    pub candidates: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PeerRating {
    pub rated_player: String,
    pub rating: i64,
}

/// **POST /api/intake/{name}**
///
/// The submitter comes from the path, it is ignored when sent in the body.
///
/// ``` shell
/// curl --request POST 'localhost:8080/api/intake/alice' \
///     --header 'Content-Type: application/json' \
///     --data-raw '{
///         "self_rating": 4,
///         "ratings": [
///             { "rated_player": "bob", "rating": 3 },
///             { "rated_player": "carol", "rating": 5 }
///         ]
///     }'
/// ```
#[derive(Debug, Deserialize)]
pub struct Submission {
    #[serde(skip)]
    pub rater: String,
    pub self_rating: i64,
    #[serde(default)]
    pub ratings: Vec<PeerRating>,
}

impl Validate<Submission> for Submission {
    fn validate(&self) -> Result<(), ServiceError> {
        validator::name(&self.rater, "name")?;
        validator::rating(self.self_rating)?;

        if self.ratings.len() > CANDIDATE_COUNT {
            bad_request!(format!("you can rate at most {} players", CANDIDATE_COUNT));
        }

        let rater = canonical_name(&self.rater);
        for peer in &self.ratings {
            validator::name(&peer.rated_player, "rated player")?;

            if canonical_name(&peer.rated_player) == rater {
                bad_request!("you can't rate yourself as a peer");
            }

            if validator::rating(peer.rating).is_err() {
                bad_request!(format!(
                    "invalid rating for {}, must be between {} and {}",
                    peer.rated_player,
                    validator::MIN_RATING,
                    validator::MAX_RATING
                ));
            }
        }

        Ok(())
    }
}

/// what was stored for a submission
#[derive(Debug, Serialize)]
pub struct Receipt {
    pub participant: Participant,
    pub ratings: Vec<RatingEntry>,
}

/// Store a validated submission.
///
/// The submitter's own record is created or updated in place and every peer
/// rating replaces an earlier rating for the same pair.
#[tracing::instrument(skip(participants, ratings))]
pub fn submit(
    submission: Submission,
    participants: &Table<Participant>,
    ratings: &Table<RatingEntry>,
) -> Result<Receipt, ServiceError> {
    let self_rating = validator::rating(submission.self_rating)?;
    let participant = Participant::new(&submission.rater, Some(self_rating));

    let entries = submission
        .ratings
        .iter()
        .map(|peer| {
            validator::rating(peer.rating)
                .map(|rating| RatingEntry::new(&participant.name, &peer.rated_player, rating))
        })
        .collect::<Result<Vec<RatingEntry>, ServiceError>>()?;

    if participants.upsert(participant.clone())? {
        info!("new participant {}", participant.name);
    }

    for entry in &entries {
        ratings.upsert(entry.clone())?;
    }

    debug!(
        "{} rated themself {} and {} peers",
        participant.name,
        self_rating,
        entries.len()
    );

    Ok(Receipt {
        participant,
        ratings: entries,
    })
}
