use actix_threadpool::BlockingError;
use actix_web::http::header;
use actix_web::{error::ResponseError, HttpResponse};
use derive_more::Display;
use std::convert::From;

/// where clients without an admin identity are sent
pub const LOGIN_ENTRY_POINT: &str = "/api/admin/login";

#[derive(Debug, Display, PartialEq)]
pub enum ServiceError {
    #[display(fmt = "Internal Server Error")]
    InternalServerError,

    #[display(fmt = "BadRequest: {}", _0)]
    BadRequest(String),

    #[display(fmt = "Conflict: {}", _0)]
    Conflict(String),

    #[display(fmt = "Unauthorized")]
    Unauthorized,

    #[display(fmt = "Login Required")]
    LoginRequired,

    #[display(fmt = "Not Found: {}", _0)]
    NotFound(String),
}

impl std::error::Error for ServiceError {}

// impl ResponseError trait allows to convert our errors into http responses with appropriate data
impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::InternalServerError => {
                HttpResponse::InternalServerError().json("Internal Server Error, Please try later")
            }
            ServiceError::BadRequest(ref message) => HttpResponse::BadRequest().json(message),
            ServiceError::Unauthorized => HttpResponse::Unauthorized().json("Unauthorized"),
            ServiceError::LoginRequired => HttpResponse::SeeOther()
                .header(header::LOCATION, LOGIN_ENTRY_POINT)
                .json("Please log in to access the admin console"),
            ServiceError::NotFound(ref message) => HttpResponse::NotFound().json(message),
            ServiceError::Conflict(ref message) => HttpResponse::Conflict().json(message),
        }
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(error: std::io::Error) -> ServiceError {
        error!("record store io error: {}", error);
        ServiceError::InternalServerError
    }
}

impl From<csv::Error> for ServiceError {
    fn from(error: csv::Error) -> ServiceError {
        error!("record store csv error: {}", error);
        ServiceError::InternalServerError
    }
}

impl From<argon2::Error> for ServiceError {
    fn from(error: argon2::Error) -> ServiceError {
        error!("unable to hash or verify password: {}", error);
        ServiceError::InternalServerError
    }
}

impl From<BlockingError<ServiceError>> for ServiceError {
    fn from(error: BlockingError<ServiceError>) -> ServiceError {
        match error {
            BlockingError::Error(error) => error,
            BlockingError::Canceled => {
                error!("actix threadpool task was canceled");
                ServiceError::InternalServerError
            }
        }
    }
}
