use argon2::Argon2;

use miniblog::{app, Config, Db, State};

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt::init();
	dotenvy::dotenv().ok();

	let config = Config::from_env();

	// The database file is wiped and rebuilt on every start; there is no
	// migration story, and none is intended.
	let database = Db::create(&config.database_path)
		.await
		.expect("failed to open database");

	let state = State {
		database,
		hasher: Argon2::default(),
	};

	let listener = tokio::net::TcpListener::bind(("127.0.0.1", config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on port {}", config.port);

	axum::serve(listener, app(state)).await.unwrap();
}
