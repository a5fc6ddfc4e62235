use argon2::Argon2;
use axum_test::TestServer;
use serde_json::{json, Value};

use miniblog::{app, Db, State};

async fn server() -> TestServer {
	let database = Db::in_memory().await.unwrap();
	let state = State {
		database,
		hasher: Argon2::default(),
	};

	TestServer::new(app(state)).unwrap()
}

#[tokio::test]
async fn create_returns_201_with_increasing_ids() {
	let server = server().await;

	let first = server
		.post("/api/posts")
		.json(&json!({ "title": "one", "author": "a", "content": "c" }))
		.await;
	let second = server
		.post("/api/posts")
		.json(&json!({ "title": "two", "author": "a", "content": "c" }))
		.await;

	first.assert_status(axum::http::StatusCode::CREATED);
	second.assert_status(axum::http::StatusCode::CREATED);

	assert_eq!(first.json::<Value>()["id"], 1);
	assert_eq!(second.json::<Value>()["id"], 2);
}

#[tokio::test]
async fn create_with_missing_field_is_400_and_persists_nothing() {
	let server = server().await;

	let response = server
		.post("/api/posts")
		.json(&json!({ "title": "one", "author": "a" }))
		.await;

	response.assert_status(axum::http::StatusCode::BAD_REQUEST);

	server
		.get("/api/posts/1")
		.await
		.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn created_post_reads_back_exactly() {
	let server = server().await;

	let expected = json!({
		"id": 1,
		"title": "X",
		"author": "Y",
		"content": "Z",
		"user_id": null,
	});

	let created = server
		.post("/api/posts")
		.json(&json!({ "title": "X", "author": "Y", "content": "Z" }))
		.await;

	created.assert_status(axum::http::StatusCode::CREATED);
	assert_eq!(created.json::<Value>(), expected);

	let read = server.get("/api/posts/1").await;

	read.assert_status_ok();
	assert_eq!(read.json::<Value>(), expected);
}

#[tokio::test]
async fn partial_update_changes_only_the_given_fields() {
	let server = server().await;

	server
		.post("/api/posts")
		.json(&json!({ "title": "X", "author": "Y", "content": "Z" }))
		.await
		.assert_status(axum::http::StatusCode::CREATED);

	let updated = server
		.put("/api/posts/1")
		.json(&json!({ "content": "Z2" }))
		.await;

	updated.assert_status_ok();
	assert_eq!(
		updated.json::<Value>(),
		json!({
			"id": 1,
			"title": "X",
			"author": "Y",
			"content": "Z2",
			"user_id": null,
		})
	);

	let read = server.get("/api/posts/1").await;
	assert_eq!(read.json::<Value>()["title"], "X");
	assert_eq!(read.json::<Value>()["content"], "Z2");
}

#[tokio::test]
async fn update_of_unknown_post_is_404() {
	let server = server().await;

	server
		.put("/api/posts/9")
		.json(&json!({ "title": "X" }))
		.await
		.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_get_is_404() {
	let server = server().await;

	server
		.post("/api/posts")
		.json(&json!({ "title": "X", "author": "Y", "content": "Z" }))
		.await
		.assert_status(axum::http::StatusCode::CREATED);

	server
		.delete("/api/posts/1")
		.await
		.assert_status(axum::http::StatusCode::NO_CONTENT);

	server
		.get("/api/posts/1")
		.await
		.assert_status(axum::http::StatusCode::NOT_FOUND);

	server
		.delete("/api/posts/1")
		.await
		.assert_status(axum::http::StatusCode::NOT_FOUND);
}
