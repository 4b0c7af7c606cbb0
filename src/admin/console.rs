use rand::Rng;

use crate::auth::Admin;
use crate::errors::ServiceError;
use crate::participants::{NewParticipant, Participant};
use crate::ratings::{GivenRating, GivenRatingUpdate, RatingEntry};
use crate::server::State;
use crate::stats::{Stats, StatsResponse};
use crate::store::canonical_name;
use crate::summary::{self, ParticipantSummary};
use crate::teams::{self, Player, Team};

/// everything the admin dashboard shows
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub participants: Vec<Participant>,
    pub ratings: Vec<RatingEntry>,
    pub summary: Vec<ParticipantSummary>,
}

#[derive(Debug, Serialize)]
pub struct Removal {
    pub name: String,
    /// ratings given or received by the removed participant
    pub ratings_removed: usize,
}

/// Admin operations over the record store.
///
/// A console can only be opened with an `Admin`, so every operation below
/// runs after the authentication check.
#[derive(Debug)]
pub struct Console<'a> {
    state: &'a State,
}

impl<'a> Console<'a> {
    pub fn new(state: &'a State, _admin: &Admin) -> Self {
        Console { state }
    }

    pub fn dashboard(&self) -> Result<Dashboard, ServiceError> {
        let participants = self.state.participants.list()?;
        let ratings = self.state.ratings.list()?;
        let summary = summary::summarize(&participants, &ratings);

        Ok(Dashboard {
            participants,
            ratings,
            summary,
        })
    }

    pub fn summary(&self) -> Result<Vec<ParticipantSummary>, ServiceError> {
        let participants = self.state.participants.list()?;
        let ratings = self.state.ratings.list()?;

        Ok(summary::summarize(&participants, &ratings))
    }

    /// balance all participants over `count` teams, the configured amount by default
    pub fn teams<R: Rng + ?Sized>(
        &self,
        count: Option<usize>,
        rng: &mut R,
    ) -> Result<Vec<Team>, ServiceError> {
        let players = self.summary()?.iter().map(Player::from).collect();

        teams::balance(players, count.unwrap_or(self.state.team_count), rng)
    }

    pub fn add_participant(&self, new: NewParticipant) -> Result<Participant, ServiceError> {
        let participant = new.into_participant();

        self.state.participants.insert(participant.clone())?;
        info!("participant \"{}\" added", participant.name);

        Ok(participant)
    }

    pub fn update_self_rating(&self, name: &str, rating: u8) -> Result<Participant, ServiceError> {
        let participant = self
            .state
            .participants
            .update(&canonical_name(name), |participant| {
                participant.self_rating = Some(rating)
            })?;
        info!(
            "rating for participant \"{}\" updated to {}",
            participant.name, rating
        );

        Ok(participant)
    }

    /// remove a participant together with every rating they gave or received
    pub fn remove_participant(&self, name: &str) -> Result<Removal, ServiceError> {
        let name = canonical_name(name);

        self.state.participants.delete(&name)?;
        let ratings_removed = self.state.ratings.retain(|entry| !entry.involves(&name))?;
        info!(
            "participant \"{}\" removed with {} ratings",
            name, ratings_removed
        );

        Ok(Removal {
            name,
            ratings_removed,
        })
    }

    /// change the first rating `rater` gave to `rated_player`
    pub fn update_rating(&self, update: GivenRatingUpdate) -> Result<RatingEntry, ServiceError> {
        let rating = crate::validator::rating(update.rating)?;
        let key = update.key();

        let entry = self
            .state
            .ratings
            .update(&key, |entry| entry.rating = Some(rating))?;
        info!("rating for {} updated to {}", key, rating);

        Ok(entry)
    }

    /// remove every rating `rater` gave to `rated_player`
    pub fn remove_rating(&self, given: GivenRating) -> Result<usize, ServiceError> {
        let key = given.key();

        let removed = self.state.ratings.delete(&key)?;
        info!("removed {} ratings for {}", removed, key);

        Ok(removed)
    }

    pub fn export_participants(&self) -> Result<Vec<u8>, ServiceError> {
        self.state.participants.export()
    }

    pub fn export_ratings(&self) -> Result<Vec<u8>, ServiceError> {
        self.state.ratings.export()
    }

    pub fn server_stats(&self, stats: &Stats) -> Result<StatsResponse, ServiceError> {
        let participants = self.state.participants.list()?.len();
        let ratings = self.state.ratings.list()?.len();

        Ok(StatsResponse::new(stats, participants, ratings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_admin;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;

    fn state(dir: &tempfile::TempDir) -> State {
        State::for_tests(dir.path())
    }

    fn seed(state: &State) {
        fs::write(
            state.participants.path(),
            "name,rating\nAlice,4\nbob,\ncarol,2\ndave,5\n",
        )
        .unwrap();
        fs::write(
            state.ratings.path(),
            "rater,rated_player,rating\nbob,alice,5\ncarol,alice,5\nalice,bob,4\nalice,carol,3\ndave,carol,3\nbob,dave,2\nalice,bob,1\n",
        )
        .unwrap();
    }

    #[test]
    fn dashboard_shows_everything() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);
        seed(&state);
        let console = Console::new(&state, &test_admin());

        let dashboard = console.dashboard().unwrap();

        assert_eq!(dashboard.participants.len(), 4);
        assert_eq!(dashboard.ratings.len(), 7);
        let names: Vec<&str> = dashboard.summary.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alice", "carol", "bob", "dave"]);
        assert_eq!(dashboard.summary[2].mean, Some(2.5));
    }

    #[test]
    fn teams_from_the_summary() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);
        seed(&state);
        let console = Console::new(&state, &test_admin());

        let teams = console
            .teams(Some(2), &mut StdRng::seed_from_u64(7))
            .unwrap();

        assert_eq!(teams[0].members, vec!["alice", "dave"]);
        assert_eq!(teams[0].total, 7.0);
        assert_eq!(teams[1].members, vec!["carol", "bob"]);
        assert_eq!(teams[1].total, 5.5);
    }

    #[test]
    fn configured_team_count_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);
        seed(&state);
        let console = Console::new(&state, &test_admin());

        let teams = console.teams(None, &mut StdRng::seed_from_u64(7)).unwrap();

        assert_eq!(teams.len(), state.team_count);
    }

    #[test]
    fn add_existing_participant() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);
        seed(&state);
        let console = Console::new(&state, &test_admin());

        let result = console.add_participant(NewParticipant {
            name: " ALICE".to_string(),
            self_rating: None,
        });

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn update_self_rating_of_unknown_participant() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);
        seed(&state);
        let console = Console::new(&state, &test_admin());
        let before = fs::read(state.participants.path()).unwrap();

        let result = console.update_self_rating("erin", 3);

        assert!(matches!(result, Err(ServiceError::NotFound(_))));
        assert_eq!(fs::read(state.participants.path()).unwrap(), before);
    }

    #[test]
    fn removing_a_participant_removes_their_ratings() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);
        seed(&state);
        let console = Console::new(&state, &test_admin());

        let removal = console.remove_participant("Alice").unwrap();

        assert_eq!(removal.ratings_removed, 5);
        let ratings = state.ratings.list().unwrap();
        assert_eq!(ratings.len(), 2);
        assert!(ratings.iter().all(|entry| !entry.involves("alice")));
        assert_eq!(state.participants.list().unwrap().len(), 3);
    }

    #[test]
    fn update_rating_changes_the_first_match() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);
        seed(&state);
        let console = Console::new(&state, &test_admin());

        let entry = console
            .update_rating(GivenRatingUpdate {
                rater: "alice".to_string(),
                rated_player: "bob".to_string(),
                rating: 2,
            })
            .unwrap();

        assert_eq!(entry, RatingEntry::new("alice", "bob", 2));
        let ratings = state.ratings.list().unwrap();
        assert_eq!(ratings[2].rating, Some(2));
        assert_eq!(ratings[6].rating, Some(1));
    }

    #[test]
    fn remove_rating_removes_every_match() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);
        seed(&state);
        let console = Console::new(&state, &test_admin());

        let removed = console
            .remove_rating(GivenRating {
                rater: "alice".to_string(),
                rated_player: "bob".to_string(),
            })
            .unwrap();

        assert_eq!(removed, 2);
        assert_eq!(state.ratings.list().unwrap().len(), 5);
    }
}
