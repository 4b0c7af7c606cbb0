use std::fmt;
use std::path::Path;

use actix_web::web::Data;
use actix_web::{get, web, HttpRequest, HttpResponse, HttpServer};

use crate::admin;
use crate::auth::{self, CredentialStore};
use crate::errors::ServiceError;
use crate::intake;
use crate::participants::Participant;
use crate::ratings::RatingEntry;
use crate::stats::Stats;
use crate::store::Table;

pub type Response = Result<HttpResponse, ServiceError>;

/// name of the cookie remembering the admin identity
pub const IDENTITY_COOKIE: &str = "peer-rating";

/// shared by all workers
pub struct State {
    pub participants: Table<Participant>,
    pub ratings: Table<RatingEntry>,
    pub credentials: Box<dyn CredentialStore>,
    /// teams to balance when no count is requested
    pub team_count: usize,
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("participants", &self.participants)
            .field("ratings", &self.ratings)
            .field("team_count", &self.team_count)
            .finish()
    }
}

impl State {
    pub fn new<P: AsRef<Path>>(
        data_dir: P,
        credentials: Box<dyn CredentialStore>,
        team_count: usize,
    ) -> Self {
        State {
            participants: Table::open(&data_dir),
            ratings: Table::open(&data_dir),
            credentials,
            team_count,
        }
    }

    /// create the record files that don't exist yet
    pub fn init(&self) -> Result<(), ServiceError> {
        self.participants.ensure_exists()?;
        self.ratings.ensure_exists()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn for_tests(data_dir: &Path) -> Self {
        let secret = auth::SharedSecret::new(TEST_PASSWORD).unwrap();
        State::new(
            data_dir,
            Box::new(secret),
            crate::teams::DEFAULT_TEAM_COUNT,
        )
    }
}

#[cfg(test)]
pub const TEST_PASSWORD: &str = "hunter2boogaloo";

#[get("/health")]
async fn health(_: HttpRequest) -> &'static str {
    "ok"
}

/// register the api, malformed bodies and queries are answered with HTTP 400
pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().limit(4096).error_handler(|err, _| {
                ServiceError::BadRequest(err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _| {
                ServiceError::BadRequest(err.to_string()).into()
            }))
            .configure(intake::routes::register)
            .configure(auth::routes::register)
            .configure(admin::routes::register)
            .service(health),
    );
}

pub async fn launch(
    state: State,
    bind: String,
    session_private_key: String,
    secure_cookies: bool,
) -> std::io::Result<()> {
    let state = Data::new(state);
    let stats = Data::new(Stats::new());

    HttpServer::new(move || {
        peer_rating_app!(
            state.clone(),
            stats.clone(),
            session_private_key.as_bytes(),
            secure_cookies
        )
    })
    .bind(bind)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;

    #[actix_rt::test]
    async fn health() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app!(dir);

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&mut app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_rt::test]
    async fn trailing_slashes_are_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app!(dir);

        for uri in &["/api/health/", "/api//health"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&mut app, req).await;

            assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
            assert!(resp.headers().contains_key("x-version"));
        }
    }

    #[actix_rt::test]
    async fn server_stats_count_requests() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app!(dir);
        let cookie = admin_cookie!(app);

        let req = test::TestRequest::get()
            .uri("/api/admin/server/stats")
            .cookie(cookie)
            .to_request();
        let stats: serde_json::Value = test::read_response_json(&mut app, req).await;

        assert_eq!(stats["requests"], 2);
        assert_eq!(stats["errors"], 0);
        assert_eq!(stats["participants"], 0);
    }

    #[test]
    fn init_creates_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let state = super::State::for_tests(dir.path());

        state.init().unwrap();

        assert!(dir.path().join("participants.csv").exists());
        assert!(dir.path().join("ratings.csv").exists());
    }
}
