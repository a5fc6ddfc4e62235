use std::path::PathBuf;

/// Startup configuration, read once from the environment.
///
/// Keeping these as explicit configuration makes the database location
/// and port injectable per deployment instead of baked-in constants.
#[derive(Debug, Clone)]
pub struct Config {
	/// Path of the SQLite database file. Recreated from scratch at startup.
	pub database_path: PathBuf,
	pub port: u16,
}

impl Config {
	#[must_use]
	pub fn from_env() -> Self {
		Self {
			database_path: std::env::var("DATABASE_PATH")
				.map_or_else(|_| PathBuf::from("blog.db"), PathBuf::from),
			port: std::env::var("PORT").map_or_else(
				|_| 3000,
				|port| port.parse().expect("PORT must be a number"),
			),
		}
	}
}
