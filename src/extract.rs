use axum::{
	body::Body,
	extract::{FromRef, FromRequest, FromRequestParts, Request},
	http::{header, request, Response},
	response::IntoResponse,
};
use serde::de;
use uuid::Uuid;

use crate::{error::Error, flash, model, session, Db};

/// Extractor that deserializes a JSON body and validates it.
pub struct Json<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
	T: de::DeserializeOwned + validator::Validate,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let result = axum::extract::Json::<T>::from_request(req, state).await?.0;

		result.validate().map_err(Error::Validation)?;
		Ok(Self(result))
	}
}

impl<T> IntoResponse for Json<T>
where
	T: serde::Serialize,
{
	fn into_response(self) -> Response<Body> {
		axum::extract::Json(self.0).into_response()
	}
}

/// Extractor that deserializes a urlencoded form body and validates it.
pub struct Form<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for Form<T>
where
	T: de::DeserializeOwned + validator::Validate,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let result = axum::extract::Form::<T>::from_request(req, state).await?.0;

		result.validate().map_err(Error::Validation)?;
		Ok(Self(result))
	}
}

/// Extracts the session and related user from the request.
///
/// This is the gate on mutating page routes: if the request carries no
/// valid session cookie, the rejection is [`Error::NotLoggedIn`], which
/// renders as a notice and a redirect to the login page. Public pages
/// take an `Option<Session>` instead.
///
/// ```rust,ignore
/// async fn route(session: Session) {
///   println!("{:?}", session.user);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub id: Uuid,
	pub user: model::User,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Db: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let cookies = parts
			.headers
			.get_all(header::COOKIE)
			.into_iter()
			.filter_map(|value| value.to_str().ok());

		let session_id = cookies
			.flat_map(cookie::Cookie::split_parse)
			.filter_map(Result::ok)
			.find(|cookie| cookie.name() == session::COOKIE_NAME)
			.ok_or(Error::NotLoggedIn)?;

		let session_id =
			Uuid::parse_str(session_id.value()).map_err(|_| Error::NotLoggedIn)?;

		let database = Db::from_ref(state);
		let user = database.session_user(session_id).await?;

		let Some(user) = user else {
			return Err(Error::NotLoggedIn);
		};

		Ok(Self {
			id: session_id,
			user,
		})
	}
}

/// Extracts the pending flash notice, if any.
///
/// The handler that renders it is responsible for attaching
/// [`Flash::clear`] to its response so the notice shows exactly once.
#[derive(Debug)]
pub struct Flash(Option<String>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Flash
where
	S: Sync + Send,
{
	type Rejection = std::convert::Infallible;

	async fn from_request_parts(
		parts: &mut request::Parts,
		_state: &S,
	) -> Result<Self, Self::Rejection> {
		let message = parts
			.headers
			.get_all(header::COOKIE)
			.into_iter()
			.filter_map(|value| value.to_str().ok())
			.flat_map(cookie::Cookie::split_parse_encoded)
			.filter_map(Result::ok)
			.find(|cookie| cookie.name() == flash::COOKIE_NAME)
			.map(|cookie| cookie.value().to_owned());

		Ok(Self(message))
	}
}

impl Flash {
	#[must_use]
	pub fn message(&self) -> Option<&str> {
		self.0.as_deref()
	}

	/// Set-Cookie header expiring the notice, present only when one was read.
	#[must_use]
	pub fn clear(self) -> Option<[(axum::http::HeaderName, String); 1]> {
		self.0
			.map(|_| [(header::SET_COOKIE, flash::clear())])
	}
}
