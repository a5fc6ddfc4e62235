use axum::{
	body::Body,
	extract::rejection,
	http::{header, Response, StatusCode},
	response::{IntoResponse, Redirect},
};

use crate::flash;

/// Error type for the application.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Fetch-by-id misses are a bare 404, uniform across the API and pages.
	#[error("resource not found")]
	NotFound,
	/// Rejection of the session gate on mutating page routes.
	#[error("not logged in")]
	NotLoggedIn,
	#[error("json error: {0}")]
	Json(#[from] rejection::JsonRejection),
	#[error("form error: {0}")]
	Form(#[from] rejection::FormRejection),
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("password hash error: {0}")]
	Hash(#[from] argon2::password_hash::Error),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		match self {
			Error::NotFound => StatusCode::NOT_FOUND.into_response(),
			Error::NotLoggedIn => (
				[(header::SET_COOKIE, flash::notice("Please log in first"))],
				Redirect::to("/login"),
			)
				.into_response(),
			Error::Json(..) | Error::Form(..) | Error::Validation(..) => {
				StatusCode::BAD_REQUEST.into_response()
			}
			error @ (Error::Hash(..) | Error::Database(..)) => {
				tracing::error!(%error, "internal error");

				StatusCode::INTERNAL_SERVER_ERROR.into_response()
			}
		}
	}
}
