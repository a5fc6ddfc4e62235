use argon2::{
	password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
	Argon2,
};
use axum::{
	extract::State,
	http::header,
	response::{AppendHeaders, IntoResponse, Redirect, Response},
	routing::get,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
	extract::{Flash, Form, Session},
	flash, render, session, AppState, Db, Error,
};

pub fn routes() -> axum::Router<AppState> {
	axum::Router::new()
		.route("/register", get(register_page).post(register))
		.route("/login", get(login_page).post(login))
		.route("/logout", get(logout))
}

#[derive(Deserialize, Validate)]
pub struct Credentials {
	#[validate(length(min = 1))]
	pub username: String,
	#[validate(length(min = 1))]
	pub password: String,
}

/// Hashes a password with Argon2 and a random salt, producing a PHC string.
/// Since this is only used for registering and logging in, the scope of
/// this function can remain in here with no issues.
pub fn hash_password(hasher: &Argon2, password: &str) -> Result<String, argon2::password_hash::Error> {
	let salt = SaltString::generate(&mut OsRng);

	Ok(hasher
		.hash_password(password.as_bytes(), &salt)?
		.to_string())
}

/// Verifies a candidate password against a stored PHC string.
/// An unparseable stored hash counts as a failed verification.
#[must_use]
pub fn verify_password(hasher: &Argon2, hash: &str, password: &str) -> bool {
	PasswordHash::new(hash)
		.map(|parsed| hasher.verify_password(password.as_bytes(), &parsed).is_ok())
		.unwrap_or(false)
}

async fn register_page(session: Option<Session>, flash: Flash) -> impl IntoResponse {
	let body = render::register(session.as_ref().map(|s| &s.user), flash.message());

	(flash.clear(), body)
}

/// Creates an account, unless the username is already taken, in which case
/// the user is sent back to the form with a notice and no row is created.
async fn register(
	State(state): State<AppState>,
	Form(input): Form<Credentials>,
) -> Result<Response, Error> {
	let hash = hash_password(&state.hasher, &input.password)?;

	match state.database.create_user(&input.username, &hash).await {
		Ok(_) => Ok(flash::redirect("/login", "Registered, please log in").into_response()),
		Err(e)
			if e.as_database_error()
				.is_some_and(|e| e.kind() == sqlx::error::ErrorKind::UniqueViolation) =>
		{
			Ok(flash::redirect("/register", "Username already taken").into_response())
		}
		Err(e) => Err(e.into()),
	}
}

async fn login_page(session: Option<Session>, flash: Flash) -> impl IntoResponse {
	let body = render::login(session.as_ref().map(|s| &s.user), flash.message());

	(flash.clear(), body)
}

/// Establishes a session if the credentials check out; otherwise the login
/// form is re-rendered with a notice, without a redirect.
async fn login(
	State(state): State<AppState>,
	Form(input): Form<Credentials>,
) -> Result<Response, Error> {
	let user = state.database.user_by_username(&input.username).await?;

	let Some(user) =
		user.filter(|user| verify_password(&state.hasher, &user.password_hash, &input.password))
	else {
		return Ok(render::login(None, Some("Invalid username or password")).into_response());
	};

	let session_id = state.database.create_session(user.id).await?;

	Ok((
		AppendHeaders([
			(header::SET_COOKIE, session::create_cookie(session_id).to_string()),
			(header::SET_COOKIE, flash::notice("Logged in")),
		]),
		Redirect::to("/"),
	)
		.into_response())
}

/// Clears the session unconditionally, whether or not one was established.
async fn logout(
	State(database): State<Db>,
	session: Option<Session>,
) -> Result<impl IntoResponse, Error> {
	if let Some(session) = session {
		database.delete_session(session.id).await?;
	}

	Ok((
		AppendHeaders([
			(header::SET_COOKIE, session::clear_cookie().to_string()),
			(header::SET_COOKIE, flash::notice("Logged out")),
		]),
		Redirect::to("/"),
	))
}

#[cfg(test)]
mod test {
	use argon2::Argon2;

	use super::{hash_password, verify_password};

	#[test]
	fn hash_and_verify_round_trip() {
		let hasher = Argon2::default();
		let hash = hash_password(&hasher, "pw1").unwrap();

		assert_ne!(hash, "pw1");
		assert!(verify_password(&hasher, &hash, "pw1"));
		assert!(!verify_password(&hasher, &hash, "pw2"));
	}

	#[test]
	fn hashes_are_salted() {
		let hasher = Argon2::default();

		let first = hash_password(&hasher, "pw1").unwrap();
		let second = hash_password(&hasher, "pw1").unwrap();

		assert_ne!(first, second);
	}

	#[test]
	fn garbage_stored_hash_never_verifies() {
		let hasher = Argon2::default();

		assert!(!verify_password(&hasher, "not a phc string", "pw1"));
	}
}
