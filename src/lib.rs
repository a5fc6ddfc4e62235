#![warn(clippy::pedantic)]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod flash;
pub mod model;
pub mod render;
pub mod route;
pub mod session;

use argon2::Argon2;
use axum::Router;

pub use config::Config;
pub use db::Db;
pub use error::Error;

pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as a database handle or a hash configuration (if it's expensive to create).
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Db,
	pub hasher: Argon2<'static>,
}

/// Assembles the full route table: the JSON API under `/api`, and the
/// server-rendered pages at the root.
pub fn app(state: State) -> Router {
	Router::new()
		.nest("/api", route::api::routes())
		.merge(route::pages::routes())
		.merge(route::auth::routes())
		.with_state(state)
}
