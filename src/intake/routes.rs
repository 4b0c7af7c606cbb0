use actix_web::web::{Data, Json, Path};
use actix_web::{get, post, web};

use crate::errors::ServiceError;
use crate::intake::{self, Candidates, Submission};
use crate::server::{Response, State};
use crate::store::canonical_name;
use crate::validator::{self, Validator};

#[get("/intake/{name}/candidates")]
async fn candidates(name: Path<String>, state: Data<State>) -> Response {
    let rater = name.into_inner();
    validator::name(&rater, "name")?;

    let candidates = web::block(move || {
        let participants = state.participants.list()?;
        let ratings = state.ratings.list()?;

        Ok::<_, ServiceError>(Candidates {
            candidates: intake::select_candidates(&rater, &participants, &ratings),
            rater: canonical_name(&rater),
        })
    })
    .await?;

    http_ok_json!(candidates);
}

#[post("/intake/{name}")]
async fn submit(name: Path<String>, submission: Json<Submission>, state: Data<State>) -> Response {
    let mut submission = submission.into_inner();
    submission.rater = name.into_inner();

    let submission = Validator::new(submission).validate()?;

    let receipt = web::block(move || {
        intake::submit(submission, &state.participants, &state.ratings)
    })
    .await?;

    http_created_json!(receipt);
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(candidates);
    cfg.service(submit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{json, Value};

    #[actix_rt::test]
    async fn submit_and_list_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app!(dir);

        for name in &["bob", "carol"] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/intake/{}", name))
                .set_json(&json!({ "self_rating": 3 }))
                .to_request();
            let resp = test::call_service(&mut app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::post()
            .uri("/api/intake/Alice")
            .set_json(&json!({
                "self_rating": 4,
                "ratings": [{ "rated_player": "Bob", "rating": 5 }]
            }))
            .to_request();
        let resp = test::call_service(&mut app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::get()
            .uri("/api/intake/dave/candidates")
            .to_request();
        let body: Value = test::read_response_json(&mut app, req).await;

        assert_eq!(
            body,
            json!({ "rater": "dave", "candidates": ["carol", "alice", "bob"] })
        );
    }

    #[actix_rt::test]
    async fn rating_of_six_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app!(dir);

        let req = test::TestRequest::post()
            .uri("/api/intake/alice")
            .set_json(&json!({
                "self_rating": 4,
                "ratings": [{ "rated_player": "bob", "rating": 6 }]
            }))
            .to_request();
        let resp = test::call_service(&mut app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(!dir.path().join("participants.csv").exists());
        assert!(!dir.path().join("ratings.csv").exists());
    }

    #[actix_rt::test]
    async fn non_numeric_ratings_are_bad_requests() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app!(dir);

        let req = test::TestRequest::post()
            .uri("/api/intake/alice")
            .set_json(&json!({ "self_rating": "four" }))
            .to_request();
        let resp = test::call_service(&mut app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
