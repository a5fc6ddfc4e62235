use std::path::Path;

use sqlx::{
	sqlite::{SqliteConnectOptions, SqlitePoolOptions},
	Pool, Sqlite,
};
use uuid::Uuid;

use crate::model::{Post, User};

/// Storage handle, cloned freely across handlers.
///
/// Every method issues a single statement; SQLite's implicit per-statement
/// transaction is the unit of durability, so a returned `Ok` means the
/// change is committed.
#[derive(Clone)]
pub struct Db(Pool<Sqlite>);

impl Db {
	/// Opens the database file, wiping any previous contents and recreating
	/// the schema. Persistence across restarts is intentionally unsupported.
	pub async fn create(path: &Path) -> Result<Self, sqlx::Error> {
		match std::fs::remove_file(path) {
			Ok(()) => {}
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
			Err(e) => return Err(sqlx::Error::Io(e)),
		}

		let options = SqliteConnectOptions::new()
			.filename(path)
			.create_if_missing(true)
			.foreign_keys(true);

		let pool = SqlitePoolOptions::new().connect_with(options).await?;

		Self::init(pool).await
	}

	/// In-memory database for tests. A single pooled connection, since each
	/// SQLite in-memory connection is its own database.
	pub async fn in_memory() -> Result<Self, sqlx::Error> {
		let options = SqliteConnectOptions::new()
			.filename(":memory:")
			.foreign_keys(true);

		// The whole database lives on that one connection, so it must
		// never be recycled.
		let pool = SqlitePoolOptions::new()
			.max_connections(1)
			.idle_timeout(None)
			.max_lifetime(None)
			.connect_with(options)
			.await?;

		Self::init(pool).await
	}

	async fn init(pool: Pool<Sqlite>) -> Result<Self, sqlx::Error> {
		sqlx::query(
			r#"
			CREATE TABLE users (
				id INTEGER PRIMARY KEY AUTOINCREMENT,
				username TEXT NOT NULL UNIQUE,
				password_hash TEXT NOT NULL
			)
			"#,
		)
		.execute(&pool)
		.await?;

		sqlx::query(
			r#"
			CREATE TABLE posts (
				id INTEGER PRIMARY KEY AUTOINCREMENT,
				title TEXT NOT NULL,
				author TEXT NOT NULL,
				content TEXT NOT NULL,
				user_id INTEGER REFERENCES users (id)
			)
			"#,
		)
		.execute(&pool)
		.await?;

		sqlx::query(
			r#"
			CREATE TABLE sessions (
				id TEXT PRIMARY KEY,
				user_id INTEGER NOT NULL REFERENCES users (id)
			)
			"#,
		)
		.execute(&pool)
		.await?;

		Ok(Self(pool))
	}

	/// Inserts a post, letting SQLite assign the next id.
	///
	/// `user_id` is `None` for posts created through the JSON API.
	pub async fn create_post(
		&self,
		title: &str,
		author: &str,
		content: &str,
		user_id: Option<i64>,
	) -> Result<Post, sqlx::Error> {
		sqlx::query_as::<_, Post>(
			r#"
			INSERT INTO posts (title, author, content, user_id)
			VALUES (?, ?, ?, ?)
			RETURNING *
			"#,
		)
		.bind(title)
		.bind(author)
		.bind(content)
		.bind(user_id)
		.fetch_one(&self.0)
		.await
	}

	pub async fn post(&self, id: i64) -> Result<Option<Post>, sqlx::Error> {
		sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = ?")
			.bind(id)
			.fetch_optional(&self.0)
			.await
	}

	/// All posts, newest id first.
	pub async fn posts(&self) -> Result<Vec<Post>, sqlx::Error> {
		sqlx::query_as::<_, Post>("SELECT * FROM posts ORDER BY id DESC")
			.fetch_all(&self.0)
			.await
	}

	/// Overwrites the mutable fields of a post. Ownership never changes.
	pub async fn update_post(&self, post: &Post) -> Result<(), sqlx::Error> {
		sqlx::query("UPDATE posts SET title = ?, author = ?, content = ? WHERE id = ?")
			.bind(&post.title)
			.bind(&post.author)
			.bind(&post.content)
			.bind(post.id)
			.execute(&self.0)
			.await?;

		Ok(())
	}

	/// Returns whether a row was actually deleted, so callers can
	/// distinguish 204 from 404.
	pub async fn delete_post(&self, id: i64) -> Result<bool, sqlx::Error> {
		let result = sqlx::query("DELETE FROM posts WHERE id = ?")
			.bind(id)
			.execute(&self.0)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	/// Inserts a user. A duplicate username surfaces as a database error
	/// with [`sqlx::error::ErrorKind::UniqueViolation`]; the caller maps it.
	pub async fn create_user(
		&self,
		username: &str,
		password_hash: &str,
	) -> Result<User, sqlx::Error> {
		sqlx::query_as::<_, User>(
			r#"
			INSERT INTO users (username, password_hash)
			VALUES (?, ?)
			RETURNING *
			"#,
		)
		.bind(username)
		.bind(password_hash)
		.fetch_one(&self.0)
		.await
	}

	pub async fn user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
		sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
			.bind(username)
			.fetch_optional(&self.0)
			.await
	}

	pub async fn create_session(&self, user_id: i64) -> Result<Uuid, sqlx::Error> {
		let id = Uuid::new_v4();

		sqlx::query("INSERT INTO sessions (id, user_id) VALUES (?, ?)")
			.bind(id.to_string())
			.bind(user_id)
			.execute(&self.0)
			.await?;

		Ok(id)
	}

	/// Resolves a session id to its user, or `None` for unknown sessions.
	pub async fn session_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
		sqlx::query_as::<_, User>(
			r#"
			SELECT * FROM users WHERE id = (
				SELECT user_id FROM sessions WHERE id = ?
			)
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.0)
		.await
	}

	pub async fn delete_session(&self, id: Uuid) -> Result<(), sqlx::Error> {
		sqlx::query("DELETE FROM sessions WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.0)
			.await?;

		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::Db;

	#[tokio::test]
	async fn post_crud() {
		let db = Db::in_memory().await.unwrap();

		let post = db.create_post("T", "A", "C", None).await.unwrap();
		assert_eq!(post.id, 1);
		assert_eq!(post.user_id, None);

		let mut post = db.post(post.id).await.unwrap().unwrap();
		assert_eq!(post.title, "T");

		post.title = "T2".into();
		db.update_post(&post).await.unwrap();
		assert_eq!(db.post(post.id).await.unwrap().unwrap().title, "T2");

		assert!(db.delete_post(post.id).await.unwrap());
		assert!(!db.delete_post(post.id).await.unwrap());
		assert!(db.post(post.id).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn in_memory_databases_are_isolated() {
		let first = Db::in_memory().await.unwrap();
		let second = Db::in_memory().await.unwrap();

		first.create_post("T", "A", "C", None).await.unwrap();

		assert_eq!(first.posts().await.unwrap().len(), 1);
		assert!(second.posts().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn posts_are_listed_newest_first() {
		let db = Db::in_memory().await.unwrap();

		db.create_post("first", "A", "C", None).await.unwrap();
		db.create_post("second", "A", "C", None).await.unwrap();

		let posts = db.posts().await.unwrap();
		let titles = posts.iter().map(|p| p.title.as_str()).collect::<Vec<_>>();

		assert_eq!(titles, ["second", "first"]);
	}

	#[tokio::test]
	async fn duplicate_username_is_a_unique_violation() {
		let db = Db::in_memory().await.unwrap();

		db.create_user("alice", "hash").await.unwrap();

		let err = db.create_user("alice", "other").await.unwrap_err();
		assert!(err
			.as_database_error()
			.is_some_and(|e| e.kind() == sqlx::error::ErrorKind::UniqueViolation));
	}

	#[tokio::test]
	async fn sessions_resolve_to_their_user() {
		let db = Db::in_memory().await.unwrap();

		let user = db.create_user("alice", "hash").await.unwrap();
		let session = db.create_session(user.id).await.unwrap();

		let found = db.session_user(session).await.unwrap().unwrap();
		assert_eq!(found.id, user.id);

		db.delete_session(session).await.unwrap();
		assert!(db.session_user(session).await.unwrap().is_none());
	}
}
