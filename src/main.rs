//! Peer rating service: participants rate themselves and their peers,
//! administrators review the results and balance teams.
#![warn(missing_debug_implementations, rust_2018_idioms)]

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate log;

#[macro_use]
extern crate serde_derive;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;

use anyhow::Error;
use dotenv::dotenv;

#[macro_use]
mod macros;

mod admin;
mod auth;
mod config;
mod errors;
mod intake;
mod participants;
mod ratings;
mod server;
mod stats;
mod store;
mod summary;
mod teams;
mod validator;

use config::Config;

#[actix_web::main]
async fn main() -> anyhow::Result<(), Error> {
    init().await?;

    Ok(())
}

async fn init() -> anyhow::Result<(), Error> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()?;

    let credentials = auth::SharedSecret::new(Config::admin_password())?;
    let state = server::State::new(Config::data_dir(), Box::new(credentials), Config::team_count());
    state.init()?;

    info!(
        "storing records in {} and {}",
        state.participants.path().display(),
        state.ratings.path().display()
    );

    debug!("launching the actix webserver");
    server::launch(
        state,
        format!("{}:{}", Config::api_host(), Config::api_port()),
        Config::session_private_key().to_string(),
        Config::secure_cookies(),
    )
    .await?;

    Ok(())
}
