#![deny(
	absolute_paths_not_starting_with_crate,
	future_incompatible,
	keyword_idents,
	macro_use_extern_crate,
	meta_variable_misuse,
	missing_abi,
	missing_copy_implementations,
	non_ascii_idents,
	nonstandard_style,
	noop_method_call,
	rust_2018_idioms
)]
#![forbid(unsafe_code)]

use axum::Extension;

mod config;
mod database;
mod error;
mod helpers;
mod projection;
mod reconcile;
mod routes;
mod seed;
mod server;
mod stores;
mod validation;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("reading configuration: {0}")]
	Config(#[from] figment::Error),
	#[error("connecting to database: {0}")]
	ConnectDb(#[from] sqlx::Error),
	#[error("seeding demo data: {0}")]
	Seed(#[source] error::Error),
	#[error("running server: {0}")]
	RunServer(#[from] hyper::Error),
	#[error("binding to Unix socket at path {1}: {0}")]
	BindUnix(#[source] std::io::Error, std::path::PathBuf),
}

#[tokio::main]
async fn main() -> Result<(), Error> {
	let config = config::config()?;

	init_logging(config.log_level);

	let database = database::connect(&config.database_url, config.max_connections).await?;

	if config.seed {
		seed::run(&*database).await.map_err(Error::Seed)?;
	}

	let mut app = routes::configure();
	app = app.layer(Extension(database));
	app = app.layer(tower_http::trace::TraceLayer::new_for_http());

	tracing::info!(address = %config.address, "listening");
	server::run(app, &config.address).await
}

fn init_logging(log_level: config::LogLevel) {
	use tracing_subscriber::filter::FilterFn;
	use tracing_subscriber::layer::{Layer, SubscriberExt};
	use tracing_subscriber::util::SubscriberInitExt;

	let filter = FilterFn::new(move |metadata| {
		let internal = metadata
			.module_path()
			.map_or(false, |path| path.split("::").next() == Some(env!("CARGO_PKG_NAME")));
		let required_level = if internal {
			log_level.internal
		} else {
			log_level.external
		};
		metadata.level() <= &required_level
	});

	let layer = tracing_subscriber::fmt::layer()
		.with_file(true)
		.with_line_number(true)
		.with_writer(std::io::stderr);

	tracing_subscriber::registry()
		.with(layer.with_filter(filter))
		.init();
}
