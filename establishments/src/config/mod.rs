use std::net::SocketAddr;

use bindable::BindableAddr;
use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;

#[derive(Deserialize)]
pub struct Config {
	#[serde(default = "default_address")]
	pub address: BindableAddr,
	#[serde(default = "default_log_level")]
	pub log_level: LogLevel,
	/// A PostgreSQL URL, or `memory:` for the in-process store.
	pub database_url: String,
	#[serde(default = "default_max_connections")]
	pub max_connections: u32,
	/// Insert demo data into an empty store at startup.
	#[serde(default)]
	pub seed: bool,
}

fn default_address() -> BindableAddr {
	BindableAddr::Tcp(SocketAddr::from(([127, 0, 0, 1], 8080)))
}

const fn default_max_connections() -> u32 {
	5
}

fn deserialize_level_filter<'de, D: serde::de::Deserializer<'de>>(
	d: D,
) -> Result<LevelFilter, D::Error>
where
	D::Error: serde::de::Error,
{
	String::deserialize(d)?
		.parse()
		.map_err(serde::de::Error::custom)
}

/// Separate thresholds for our own events and for those of our dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "LogLevelSerdeHelper")]
pub struct LogLevel {
	pub internal: LevelFilter,
	pub external: LevelFilter,
}

const fn default_log_level_internal() -> LevelFilter {
	LevelFilter::INFO
}

const fn default_log_level_external() -> LevelFilter {
	LevelFilter::WARN
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LogLevelSerdeHelper {
	#[serde(deserialize_with = "deserialize_level_filter")]
	Together(LevelFilter),
	Separate {
		#[serde(
			deserialize_with = "deserialize_level_filter",
			default = "default_log_level_internal"
		)]
		internal: LevelFilter,
		#[serde(
			deserialize_with = "deserialize_level_filter",
			default = "default_log_level_external"
		)]
		external: LevelFilter,
	},
}

impl From<LogLevelSerdeHelper> for LogLevel {
	fn from(helper: LogLevelSerdeHelper) -> Self {
		match helper {
			LogLevelSerdeHelper::Together(level) => Self {
				internal: level,
				external: level,
			},
			LogLevelSerdeHelper::Separate { internal, external } => Self { internal, external },
		}
	}
}

const fn default_log_level() -> LogLevel {
	LogLevel {
		internal: default_log_level_internal(),
		external: default_log_level_external(),
	}
}

fn figment() -> figment::Figment {
	use figment::providers::Format as _;

	figment::Figment::new()
		.merge(figment::providers::Toml::file("establishments.toml"))
		.merge(figment::providers::Env::prefixed("ESTABLISHMENTS_"))
}

pub fn config() -> Result<Config, figment::Error> {
	figment().extract()
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn defaults() {
		figment::Jail::expect_with(|jail| {
			jail.set_env("ESTABLISHMENTS_DATABASE_URL", "memory:");
			let config = config()?;
			assert_eq!(config.database_url, "memory:");
			assert!(matches!(
				config.address,
				BindableAddr::Tcp(addr) if addr == SocketAddr::from(([127, 0, 0, 1], 8080))
			));
			assert_eq!(config.log_level, default_log_level());
			assert_eq!(config.max_connections, 5);
			assert!(!config.seed);
			Ok(())
		});
	}

	#[test]
	fn file_then_environment() {
		figment::Jail::expect_with(|jail| {
			jail.create_file(
				"establishments.toml",
				r#"
					database_url = "postgres://localhost/establishments"
					address = "0.0.0.0:3000"
					seed = true
					log_level = { internal = "debug" }
				"#,
			)?;
			jail.set_env("ESTABLISHMENTS_MAX_CONNECTIONS", "12");
			let config = config()?;
			assert_eq!(config.database_url, "postgres://localhost/establishments");
			assert!(matches!(
				config.address,
				BindableAddr::Tcp(addr) if addr.port() == 3000
			));
			assert!(config.seed);
			assert_eq!(config.max_connections, 12);
			assert_eq!(
				config.log_level,
				LogLevel {
					internal: LevelFilter::DEBUG,
					external: LevelFilter::WARN,
				}
			);
			Ok(())
		});
	}

	#[test]
	fn database_url_is_required() {
		figment::Jail::expect_with(|_jail| {
			assert!(config().is_err());
			Ok(())
		});
	}

	#[test]
	fn single_log_level() {
		figment::Jail::expect_with(|jail| {
			jail.set_env("ESTABLISHMENTS_DATABASE_URL", "memory:");
			jail.set_env("ESTABLISHMENTS_LOG_LEVEL", "trace");
			let config = config()?;
			assert_eq!(config.log_level.internal, LevelFilter::TRACE);
			assert_eq!(config.log_level.external, LevelFilter::TRACE);
			Ok(())
		});
	}
}
