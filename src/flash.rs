use axum::{
	http::header,
	response::{IntoResponse, Redirect},
};

pub const COOKIE_NAME: &str = "flash";

/// One-shot notice carried to the next rendered page in a cookie.
///
/// The value is percent-encoded since notices contain spaces; the
/// [`crate::extract::Flash`] extractor decodes it on the way back in.
#[must_use]
pub fn notice(message: &str) -> String {
	let cookie: cookie::Cookie = cookie::Cookie::build((COOKIE_NAME, message.to_owned()))
		.http_only(true)
		.path("/")
		.into();

	cookie.encoded().to_string()
}

/// Expires the notice cookie once it has been rendered.
#[must_use]
pub fn clear() -> String {
	let cookie: cookie::Cookie = cookie::Cookie::build(COOKIE_NAME)
		.http_only(true)
		.path("/")
		.max_age(cookie::time::Duration::ZERO)
		.into();

	cookie.to_string()
}

/// Redirects with a pending notice, the page controller's rejection shape
/// for everything that is a user mistake rather than an error.
pub fn redirect(to: &str, message: &str) -> impl IntoResponse {
	(
		[(header::SET_COOKIE, notice(message))],
		Redirect::to(to),
	)
}

#[cfg(test)]
mod test {
	#[test]
	fn notice_round_trips_through_encoding() {
		let header = super::notice("Please log in first");

		let cookie = cookie::Cookie::parse_encoded(header).unwrap();

		assert_eq!(cookie.name(), super::COOKIE_NAME);
		assert_eq!(cookie.value(), "Please log in first");
	}

	#[test]
	fn clear_expires_immediately() {
		let cookie = cookie::Cookie::parse(super::clear()).unwrap();

		assert_eq!(cookie.max_age(), Some(cookie::time::Duration::ZERO));
	}
}
