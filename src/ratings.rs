use std::fmt;

use crate::errors::ServiceError;
use crate::store::{canonical_name, Record};
use crate::validator::{self, Validate};

/// one peer rating from `rater` to `rated_player`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub rater: String,
    pub rated_player: String,
    /// `None` when the stored value isn't a number
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub rating: Option<u8>,
}

impl RatingEntry {
    pub fn new(rater: &str, rated_player: &str, rating: u8) -> Self {
        RatingEntry {
            rater: canonical_name(rater),
            rated_player: canonical_name(rated_player),
            rating: Some(rating),
        }
    }

    /// the rating, if it lies on the rating scale
    pub fn valid_rating(&self) -> Option<u8> {
        self.rating
            .filter(|rating| validator::rating(i64::from(*rating)).is_ok())
    }

    /// true when `name` either gave or received this rating
    pub fn involves(&self, name: &str) -> bool {
        self.rater == name || self.rated_player == name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatingKey {
    pub rater: String,
    pub rated_player: String,
}

impl RatingKey {
    pub fn new(rater: &str, rated_player: &str) -> Self {
        RatingKey {
            rater: canonical_name(rater),
            rated_player: canonical_name(rated_player),
        }
    }
}

impl fmt::Display for RatingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.rater, self.rated_player)
    }
}

impl Record for RatingEntry {
    type Key = RatingKey;

    const NAME: &'static str = "rating";
    const FILE_NAME: &'static str = "ratings.csv";
    const HEADERS: &'static [&'static str] = &["rater", "rated_player", "rating"];

    fn key(&self) -> RatingKey {
        RatingKey {
            rater: self.rater.clone(),
            rated_player: self.rated_player.clone(),
        }
    }

    fn canonicalize(&mut self) {
        self.rater = canonical_name(&self.rater);
        self.rated_player = canonical_name(&self.rated_player);
    }
}

/// identifies given ratings in admin requests
///
/// **DELETE /api/admin/ratings?rater=alice&rated_player=bob**
#[derive(Debug, Deserialize)]
pub struct GivenRating {
    pub rater: String,
    pub rated_player: String,
}

impl Validate<GivenRating> for GivenRating {
    fn validate(&self) -> Result<(), ServiceError> {
        validator::name(&self.rater, "rater")?;
        validator::name(&self.rated_player, "rated player")?;
        Ok(())
    }
}

impl GivenRating {
    pub fn key(&self) -> RatingKey {
        RatingKey::new(&self.rater, &self.rated_player)
    }
}

/// **PUT /api/admin/ratings**
///
/// ``` shell
/// curl --request PUT 'localhost:8080/api/admin/ratings' \
///     --header 'Content-Type: application/json' \
///     --data-raw '{ "rater": "alice", "rated_player": "bob", "rating": 4 }'
/// ```
#[derive(Debug, Deserialize)]
pub struct GivenRatingUpdate {
    pub rater: String,
    pub rated_player: String,
    pub rating: i64,
}

impl Validate<GivenRatingUpdate> for GivenRatingUpdate {
    fn validate(&self) -> Result<(), ServiceError> {
        validator::name(&self.rater, "rater")?;
        validator::name(&self.rated_player, "rated player")?;
        validator::rating(self.rating)?;
        Ok(())
    }
}

impl GivenRatingUpdate {
    pub fn key(&self) -> RatingKey {
        RatingKey::new(&self.rater, &self.rated_player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Validator;

    #[test]
    fn out_of_range_ratings_are_not_valid() {
        let mut entry = RatingEntry::new("alice", "bob", 3);
        assert_eq!(entry.valid_rating(), Some(3));

        entry.rating = Some(7);
        assert_eq!(entry.valid_rating(), None);

        entry.rating = None;
        assert_eq!(entry.valid_rating(), None);
    }

    #[test]
    fn keys_ignore_case_and_whitespace() {
        let entry = RatingEntry::new("Alice ", " BOB", 3);

        assert_eq!(entry.key(), RatingKey::new("alice", "bob"));
        assert_eq!(entry.key().to_string(), "alice -> bob");
    }

    #[test]
    fn involvement() {
        let entry = RatingEntry::new("alice", "bob", 3);

        assert!(entry.involves("alice"));
        assert!(entry.involves("bob"));
        assert!(!entry.involves("carol"));
    }

    #[test]
    fn update_with_invalid_rating() {
        let update = GivenRatingUpdate {
            rater: String::from("alice"),
            rated_player: String::from("bob"),
            rating: 6,
        };

        assert!(Validator::new(update).validate().is_err());
    }

    #[test]
    fn update_without_rater() {
        let update = GivenRatingUpdate {
            rater: String::from(""),
            rated_player: String::from("bob"),
            rating: 3,
        };

        assert!(Validator::new(update).validate().is_err());
    }
}
