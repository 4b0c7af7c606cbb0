//! Team balancing.
//!
//! Rated participants are spread over the teams greedily: strongest first,
//! each one joining the team with the lowest total so far. This keeps the
//! totals within one rating of each other without searching for an optimal
//! partition. Participants without ratings carry no weight and are placed
//! on a random team.
use rand::Rng;

use crate::errors::ServiceError;
use crate::summary::{self, ParticipantSummary};

pub const DEFAULT_TEAM_COUNT: usize = 4;
pub const MAX_TEAM_COUNT: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Team {
    /// member names in the order they were assigned
    pub members: Vec<String>,
    /// sum of the mean ratings of the rated members
    pub total: f64,
}

/// someone to place on a team, `rating` is `None` for unrated participants
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub name: String,
    pub rating: Option<f64>,
}

impl From<&ParticipantSummary> for Player {
    fn from(summary: &ParticipantSummary) -> Self {
        Player {
            name: summary.name.clone(),
            rating: summary.mean,
        }
    }
}

/// Divide `players` over `count` teams.
///
/// The rated players are placed deterministically, the unrated ones are
/// placed using `rng`.
pub fn balance<R: Rng + ?Sized>(
    players: Vec<Player>,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Team>, ServiceError> {
    if count == 0 {
        bad_request!("the number of teams should be at least 1");
    }
    if count > MAX_TEAM_COUNT {
        bad_request!(format!("the number of teams can't exceed {}", MAX_TEAM_COUNT));
    }

    let (mut rated, unrated): (Vec<Player>, Vec<Player>) =
        players.into_iter().partition(|player| player.rating.is_some());

    rated.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut teams = vec![
        Team {
            members: Vec::new(),
            total: 0.0,
        };
        count
    ];

    for player in rated {
        let weakest = weakest_team(&teams);
        let team = &mut teams[weakest];
        team.total += player.rating.unwrap_or_default();
        team.members.push(player.name);
    }

    for player in unrated {
        let index = rng.gen_range(0, count);
        teams[index].members.push(player.name);
    }

    for team in teams.iter_mut() {
        team.total = summary::round(team.total);
    }

    debug!("balanced players over {} teams", count);

    Ok(teams)
}

/// index of the team with the lowest total, the first one on ties
fn weakest_team(teams: &[Team]) -> usize {
    let mut weakest = 0;
    for (index, team) in teams.iter().enumerate().skip(1) {
        if team.total < teams[weakest].total {
            weakest = index;
        }
    }
    weakest
}
