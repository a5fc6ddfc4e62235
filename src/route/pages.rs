use axum::{
	extract::{Path, State},
	response::{IntoResponse, Redirect, Response},
	routing::{get, post},
};
use serde::Deserialize;
use validator::Validate;

use crate::{
	extract::{Flash, Form, Session},
	flash, render, AppState, Db, Error,
};

pub fn routes() -> axum::Router<AppState> {
	axum::Router::new()
		.route("/", get(index))
		.route("/post/:id", get(post_detail))
		.route("/new", get(new_post_page).post(new_post))
		.route("/edit/:id", get(edit_post_page).post(edit_post))
		.route("/delete/:id", post(delete_post))
}

#[derive(Deserialize, Validate)]
pub struct PostForm {
	pub title: String,
	pub author: String,
	pub content: String,
}

async fn index(
	State(database): State<Db>,
	session: Option<Session>,
	flash: Flash,
) -> Result<impl IntoResponse, Error> {
	let posts = database.posts().await?;
	let body = render::index(&posts, session.as_ref().map(|s| &s.user), flash.message());

	Ok((flash.clear(), body))
}

async fn post_detail(
	State(database): State<Db>,
	session: Option<Session>,
	flash: Flash,
	Path(id): Path<i64>,
) -> Result<impl IntoResponse, Error> {
	let post = database.post(id).await?.ok_or(Error::NotFound)?;
	let body = render::post_detail(&post, session.as_ref().map(|s| &s.user), flash.message());

	Ok((flash.clear(), body))
}

async fn new_post_page(session: Session, flash: Flash) -> impl IntoResponse {
	let body = render::post_form("/new", None, Some(&session.user), flash.message());

	(flash.clear(), body)
}

/// Creates a post owned by the session user.
async fn new_post(
	State(database): State<Db>,
	session: Session,
	Form(input): Form<PostForm>,
) -> Result<Redirect, Error> {
	database
		.create_post(
			&input.title,
			&input.author,
			&input.content,
			Some(session.user.id),
		)
		.await?;

	Ok(Redirect::to("/"))
}

async fn edit_post_page(
	State(database): State<Db>,
	session: Session,
	flash: Flash,
	Path(id): Path<i64>,
) -> Result<Response, Error> {
	let post = database.post(id).await?.ok_or(Error::NotFound)?;

	if post.user_id != Some(session.user.id) {
		return Ok(flash::redirect("/", "You can only edit your own posts").into_response());
	}

	let action = format!("/edit/{id}");
	let body = render::post_form(&action, Some(&post), Some(&session.user), flash.message());

	Ok((flash.clear(), body).into_response())
}

/// Overwrites title, author and content, owner only. A non-owner is sent
/// back to the list with a notice and the post is left untouched.
async fn edit_post(
	State(database): State<Db>,
	session: Session,
	Path(id): Path<i64>,
	Form(input): Form<PostForm>,
) -> Result<Response, Error> {
	let mut post = database.post(id).await?.ok_or(Error::NotFound)?;

	if post.user_id != Some(session.user.id) {
		return Ok(flash::redirect("/", "You can only edit your own posts").into_response());
	}

	post.title = input.title;
	post.author = input.author;
	post.content = input.content;

	database.update_post(&post).await?;

	Ok(Redirect::to(&format!("/post/{id}")).into_response())
}

/// Deletes a post, with the same ownership policy as editing.
async fn delete_post(
	State(database): State<Db>,
	session: Session,
	Path(id): Path<i64>,
) -> Result<Response, Error> {
	let post = database.post(id).await?.ok_or(Error::NotFound)?;

	if post.user_id != Some(session.user.id) {
		return Ok(flash::redirect("/", "You can only delete your own posts").into_response());
	}

	database.delete_post(id).await?;

	Ok(Redirect::to("/").into_response())
}
