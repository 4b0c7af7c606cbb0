use crate::errors::ServiceError;
use crate::store::{canonical_name, Record};
use crate::validator::{self, Validate};

/// someone who can rate and be rated, keyed by canonical name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    #[serde(
        rename(deserialize = "rating"),
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub self_rating: Option<u8>,
}

impl Participant {
    pub fn new(name: &str, self_rating: Option<u8>) -> Self {
        Participant {
            name: canonical_name(name),
            self_rating,
        }
    }
}

impl Record for Participant {
    type Key = String;

    const NAME: &'static str = "participant";
    const FILE_NAME: &'static str = "participants.csv";
    const HEADERS: &'static [&'static str] = &["name", "rating"];

    fn key(&self) -> String {
        self.name.clone()
    }

    fn canonicalize(&mut self) {
        self.name = canonical_name(&self.name);
        self.self_rating = self
            .self_rating
            .filter(|rating| validator::rating(i64::from(*rating)).is_ok());
    }
}

/// **POST /api/admin/participants**
///
/// ``` shell
/// curl --request POST 'localhost:8080/api/admin/participants' \
///     --header 'Content-Type: application/json' \
///     --data-raw '{ "name": "alice", "self_rating": 4 }'
/// ```
#[derive(Debug, Deserialize)]
pub struct NewParticipant {
    pub name: String,
    pub self_rating: Option<i64>,
}

impl Validate<NewParticipant> for NewParticipant {
    fn validate(&self) -> Result<(), ServiceError> {
        validator::name(&self.name, "participant name")?;

        if let Some(rating) = self.self_rating {
            validator::rating(rating)?;
        }

        Ok(())
    }
}

impl NewParticipant {
    pub fn into_participant(self) -> Participant {
        let self_rating = self
            .self_rating
            .and_then(|rating| validator::rating(rating).ok());

        Participant::new(&self.name, self_rating)
    }
}

/// **PUT /api/admin/participants/{name}**
#[derive(Debug, Deserialize)]
pub struct SelfRatingUpdate {
    pub self_rating: i64,
}

impl Validate<SelfRatingUpdate> for SelfRatingUpdate {
    fn validate(&self) -> Result<(), ServiceError> {
        validator::rating(self.self_rating)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Validator;

    #[test]
    fn names_are_canonical() {
        let participant = Participant::new("  Ricky Bobby ", Some(3));

        assert_eq!(participant.key(), "ricky bobby");
    }

    #[test]
    fn out_of_range_self_ratings_are_dropped() {
        let mut participant = Participant {
            name: "Bob".to_string(),
            self_rating: Some(9),
        };

        participant.canonicalize();

        assert_eq!(participant, Participant::new("bob", None));
    }

    #[test]
    fn empty_participant_name() {
        let participant = NewParticipant {
            name: String::from("  "),
            self_rating: None,
        };

        assert!(Validator::new(participant).validate().is_err());
    }

    #[test]
    fn invalid_self_rating() {
        let participant = NewParticipant {
            name: String::from("alice"),
            self_rating: Some(6),
        };

        assert!(Validator::new(participant).validate().is_err());
    }

    #[test]
    fn valid_participant_without_rating() {
        let participant = NewParticipant {
            name: String::from("Alice"),
            self_rating: None,
        };

        let participant = Validator::new(participant).validate().unwrap();

        assert_eq!(
            participant.into_participant(),
            Participant::new("alice", None)
        );
    }
}
