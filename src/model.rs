use serde::Serialize;
use sqlx::FromRow;

/// A model representing a single user.
///
/// Use this when fetching from the database and returning to the client.
/// The `password_hash` field is not serialized to the client.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
	pub id: i64,
	pub username: String,
	/// argon2 PHC string, never the plaintext password
	#[serde(skip_serializing)]
	pub password_hash: String,
}

/// A model representing a single post.
///
/// `author` is free text and need not match the owning user's username.
/// `user_id` is `None` for posts created through the JSON API, which has
/// no notion of a logged-in user.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Post {
	pub id: i64,
	pub title: String,
	pub author: String,
	pub content: String,
	pub user_id: Option<i64>,
}
