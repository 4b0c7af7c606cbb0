use crate::errors::ServiceError;
use serde::de::DeserializeOwned;

#[derive(Deserialize, Debug)]
pub struct Validator<T>(T);

pub trait Validate<T> {
    fn validate(&self) -> Result<(), ServiceError>;
}

impl<T> Validator<T> {
    pub fn new(i: T) -> Validator<T> {
        Validator::<T>(i)
    }
}

impl<T> Validator<T>
where
    T: Validate<T>,
    T: DeserializeOwned,
{
    pub fn validate(self) -> Result<T, ServiceError> {
        self.0.validate()?;
        Ok(self.0)
    }
}

/// the lowest accepted rating
pub const MIN_RATING: i64 = 1;
/// the highest accepted rating
pub const MAX_RATING: i64 = 5;

/// checks that a submitted rating lies within `MIN_RATING..=MAX_RATING`
pub fn rating(value: i64) -> Result<u8, ServiceError> {
    if value < MIN_RATING || value > MAX_RATING {
        bad_request!(format!(
            "invalid rating {}, please select a rating between {} and {}",
            value, MIN_RATING, MAX_RATING
        ));
    }

    Ok(value as u8)
}

/// checks that a name has content after trimming
pub fn name(value: &str, field: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        bad_request!(format!("{} cannot be empty", field));
    }

    Ok(())
}
