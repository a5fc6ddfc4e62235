use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	routing::{get, post},
};
use serde::Deserialize;
use validator::Validate;

use crate::{extract::Json, AppState, Db, Error};

/// JSON CRUD over posts. Deliberately unauthenticated: these endpoints
/// carry no session gate and no ownership check, unlike the parallel page
/// routes. Posts created here have no owning user.
pub fn routes() -> axum::Router<AppState> {
	axum::Router::new()
		.route("/posts", post(create_post))
		.route(
			"/posts/:id",
			get(read_post).put(update_post).delete(delete_post),
		)
}

/// All three fields are required; a body missing any of them is rejected
/// by deserialization with a 400 before the handler runs.
#[derive(Deserialize, Validate)]
pub struct CreatePostInput {
	pub title: String,
	pub author: String,
	pub content: String,
}

#[derive(Deserialize, Validate)]
pub struct UpdatePostInput {
	pub title: Option<String>,
	pub author: Option<String>,
	pub content: Option<String>,
}

/// Persists a new post with no owning user and returns it with 201.
async fn create_post(
	State(database): State<Db>,
	Json(input): Json<CreatePostInput>,
) -> Result<impl IntoResponse, Error> {
	let post = database
		.create_post(&input.title, &input.author, &input.content, None)
		.await?;

	Ok((StatusCode::CREATED, Json(post)))
}

async fn read_post(
	State(database): State<Db>,
	Path(id): Path<i64>,
) -> Result<impl IntoResponse, Error> {
	let post = database.post(id).await?.ok_or(Error::NotFound)?;

	Ok(Json(post))
}

/// Overwrites only the fields present in the body; absent fields are left
/// untouched. Returns the full updated representation.
async fn update_post(
	State(database): State<Db>,
	Path(id): Path<i64>,
	Json(input): Json<UpdatePostInput>,
) -> Result<impl IntoResponse, Error> {
	let mut post = database.post(id).await?.ok_or(Error::NotFound)?;

	if let Some(title) = input.title {
		post.title = title;
	}

	if let Some(author) = input.author {
		post.author = author;
	}

	if let Some(content) = input.content {
		post.content = content;
	}

	database.update_post(&post).await?;

	Ok(Json(post))
}

async fn delete_post(
	State(database): State<Db>,
	Path(id): Path<i64>,
) -> Result<StatusCode, Error> {
	if database.delete_post(id).await? {
		Ok(StatusCode::NO_CONTENT)
	} else {
		Err(Error::NotFound)
	}
}
