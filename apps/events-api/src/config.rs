use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_accepts_mongo_uri_and_default_port() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None),
                ("MONGO_URL", None),
                ("MONGO_URI", Some("mongodb://db.internal:27017/eventsdb")),
                ("PORT", None),
                ("APP_ENV", Some("production")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.mongodb.url(), "mongodb://db.internal:27017/eventsdb");
                assert_eq!(config.server.port, 3000);
                assert!(config.environment.is_production());
                assert_eq!(config.app.name, "events_api");
            },
        );
    }

    #[test]
    fn test_config_requires_a_mongo_url() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None::<&str>),
                ("MONGO_URL", None),
                ("MONGO_URI", None),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("MONGO_URI"));
            },
        );
    }
}
