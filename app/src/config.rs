use std::collections::HashMap;

use anyhow::{Context, Result};
use log::*;
use r2d2::Pool;
use r2d2_postgres::{PostgresConnectionManager, TlsMode};
use serde::{Deserialize, Serialize};

use infra::persistence::DocumentConnectionManager;

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct Config {
    pub db: PgConfig,
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct PgConfig {
    pub url: String,
    pub max_connections: Option<u32>,
}

impl Config {
    /// Environment-only configuration, for when no config file is given.
    pub fn from_env() -> Result<Self> {
        #[derive(Deserialize, Debug)]
        struct Env {
            database_url: String,
        }

        let env: Env = envy::prefixed("BARKEEP_")
            .from_env()
            .context("read environment")?;
        Ok(Config {
            db: PgConfig {
                url: env.database_url,
                max_connections: None,
            },
        })
    }
}

impl PgConfig {
    pub(crate) fn build(&self) -> Result<Pool<DocumentConnectionManager>> {
        debug!("Build pool from {:?}", self);

        let manager =
            DocumentConnectionManager::new(PostgresConnectionManager::new(&*self.url, TlsMode::None)?);

        let mut builder = r2d2::Pool::builder();
        if let Some(size) = self.max_connections {
            builder = builder.max_size(size);
        }

        debug!("Pool builder: {:?}", builder);
        let pool = builder.build(manager).context("build pool")?;

        Ok(pool)
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug)]
pub struct EnvLogger {
    level: Option<LogLevel>,
    #[serde(default)]
    modules: HashMap<String, LogLevel>,
}

impl LogLevel {
    fn to_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl EnvLogger {
    pub fn builder(&self) -> env_logger::Builder {
        let mut b = env_logger::Builder::from_default_env();
        if let Some(level) = self.level.as_ref() {
            b.filter_level(level.to_filter());
        }

        for (module, level) in self.modules.iter() {
            b.filter_module(module, level.to_filter());
        }

        b
    }
}
