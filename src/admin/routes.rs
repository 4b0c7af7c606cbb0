use actix_identity::Identity;
use actix_web::http::header;
use actix_web::web::{Data, HttpResponse, Json, Path, Query};
use actix_web::{delete, get, post, put, web};

use crate::admin::Console;
use crate::auth;
use crate::participants::{NewParticipant, Participant, SelfRatingUpdate};
use crate::ratings::{GivenRating, GivenRatingUpdate, RatingEntry};
use crate::server::{Response, State};
use crate::stats::Stats;
use crate::store::Record;
use crate::validator::{self, Validator};

#[derive(Debug, Deserialize)]
pub struct TeamQuery {
    /// number of teams, the configured team count when missing
    pub count: Option<usize>,
}

#[get("/admin/dashboard")]
async fn dashboard(state: Data<State>, id: Identity) -> Response {
    let admin = auth::verify_admin(&id)?;

    let dashboard = web::block(move || Console::new(&state, &admin).dashboard()).await?;

    http_ok_json!(dashboard);
}

#[get("/admin/summary")]
async fn summary(state: Data<State>, id: Identity) -> Response {
    let admin = auth::verify_admin(&id)?;

    let summary = web::block(move || Console::new(&state, &admin).summary()).await?;

    http_ok_json!(summary);
}

#[get("/admin/teams")]
async fn teams(query: Query<TeamQuery>, state: Data<State>, id: Identity) -> Response {
    let admin = auth::verify_admin(&id)?;
    let count = query.into_inner().count;

    let teams = web::block(move || {
        Console::new(&state, &admin).teams(count, &mut rand::thread_rng())
    })
    .await?;

    http_ok_json!(teams);
}

#[post("/admin/participants")]
async fn add_participant(
    participant: Json<Validator<NewParticipant>>,
    state: Data<State>,
    id: Identity,
) -> Response {
    let admin = auth::verify_admin(&id)?;
    let participant = participant.into_inner().validate()?;

    let participant =
        web::block(move || Console::new(&state, &admin).add_participant(participant)).await?;

    http_created_json!(participant);
}

#[put("/admin/participants/{name}")]
async fn update_participant(
    name: Path<String>,
    update: Json<Validator<SelfRatingUpdate>>,
    state: Data<State>,
    id: Identity,
) -> Response {
    let admin = auth::verify_admin(&id)?;
    let update = update.into_inner().validate()?;
    let rating = validator::rating(update.self_rating)?;
    let name = name.into_inner();

    let participant = web::block(move || {
        Console::new(&state, &admin).update_self_rating(&name, rating)
    })
    .await?;

    http_ok_json!(participant);
}

#[delete("/admin/participants/{name}")]
async fn remove_participant(name: Path<String>, state: Data<State>, id: Identity) -> Response {
    let admin = auth::verify_admin(&id)?;
    let name = name.into_inner();
    validator::name(&name, "participant name")?;

    let removal =
        web::block(move || Console::new(&state, &admin).remove_participant(&name)).await?;

    http_ok_json!(removal);
}

#[put("/admin/ratings")]
async fn update_rating(
    update: Json<Validator<GivenRatingUpdate>>,
    state: Data<State>,
    id: Identity,
) -> Response {
    let admin = auth::verify_admin(&id)?;
    let update = update.into_inner().validate()?;

    let entry = web::block(move || Console::new(&state, &admin).update_rating(update)).await?;

    http_ok_json!(entry);
}

#[delete("/admin/ratings")]
async fn remove_rating(
    given: Query<GivenRating>,
    state: Data<State>,
    id: Identity,
) -> Response {
    let admin = auth::verify_admin(&id)?;
    let given = Validator::new(given.into_inner()).validate()?;

    let removed = web::block(move || Console::new(&state, &admin).remove_rating(given)).await?;

    http_ok_json!(serde_json::json!({ "removed": removed }));
}

#[get("/admin/export/participants")]
async fn export_participants(state: Data<State>, id: Identity) -> Response {
    let admin = auth::verify_admin(&id)?;

    let contents =
        web::block(move || Console::new(&state, &admin).export_participants()).await?;

    Ok(attachment(Participant::FILE_NAME, contents))
}

#[get("/admin/export/ratings")]
async fn export_ratings(state: Data<State>, id: Identity) -> Response {
    let admin = auth::verify_admin(&id)?;

    let contents = web::block(move || Console::new(&state, &admin).export_ratings()).await?;

    Ok(attachment(RatingEntry::FILE_NAME, contents))
}

#[get("/admin/server/stats")]
async fn server_stats(state: Data<State>, stats: Data<Stats>, id: Identity) -> Response {
    let admin = auth::verify_admin(&id)?;

    let response =
        web::block(move || Console::new(&state, &admin).server_stats(&stats)).await?;

    http_ok_json!(response);
}

fn attachment(file_name: &str, contents: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        )
        .body(contents)
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard);
    cfg.service(summary);
    cfg.service(teams);
    cfg.service(add_participant);
    cfg.service(update_participant);
    cfg.service(remove_participant);
    cfg.service(update_rating);
    cfg.service(remove_rating);
    cfg.service(export_participants);
    cfg.service(export_ratings);
    cfg.service(server_stats);
}
