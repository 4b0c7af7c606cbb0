use actix_identity::Identity;
use actix_web::web::{Data, Json};
use actix_web::{post, web};
use serde_json::json;

use crate::auth::{self, Credentials};
use crate::server::{Response, State};

#[post("/admin/login")]
async fn login(credentials: Json<Credentials>, state: Data<State>, id: Identity) -> Response {
    let credentials = credentials.into_inner();

    let verified = web::block(move || state.credentials.verify(&credentials.password)).await;

    if let Err(error) = verified {
        warn!("failed admin login attempt");
        return Err(error.into());
    }

    auth::remember_admin(&id);
    info!("administrator logged in");

    http_ok_json!(json!({ "message": "Successfully logged in" }));
}

#[post("/admin/logout")]
async fn logout(id: Identity) -> Response {
    auth::verify_admin(&id)?;

    id.forget();

    http_ok_json!(json!({ "message": "Successfully signed out" }));
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(login);
    cfg.service(logout);
}
