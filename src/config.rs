use std::net::SocketAddr;
use std::time::Duration;

use bb8_postgres::tokio_postgres;
use clap::Parser;

use crate::services::search_service::{SearchSettings, DEFAULT_QUERY_TIMEOUT_MS};

#[derive(Parser, Clone, Debug)]
#[command(about = "Restaurant search API")]
pub struct Config {
    /// Address the HTTP server binds to.
    #[clap(env, long, default_value = "0.0.0.0:5000")]
    pub listen_addr: SocketAddr,

    #[clap(env, long, default_value = "localhost")]
    pub db_host: String,

    #[clap(env, long, default_value_t = 5432)]
    pub db_port: u16,

    #[clap(env, long, default_value = "postgres")]
    pub db_user: String,

    #[clap(env, long, default_value = "", hide_env_values = true)]
    pub db_password: String,

    #[clap(env, long, default_value = "restaurants")]
    pub db_name: String,

    /// Maximum number of pooled postgres connections.
    #[clap(env, long, default_value_t = 16)]
    pub db_pool_size: u32,

    #[clap(env, long, default_value_t = 5)]
    pub db_connection_timeout_secs: u64,

    /// Upper bound on a single search query, connection wait included.
    #[clap(env, long, default_value_t = DEFAULT_QUERY_TIMEOUT_MS)]
    pub query_timeout_ms: u64,
}

impl Config {
    pub fn postgres_config(&self) -> tokio_postgres::Config {
        let mut pg = tokio_postgres::Config::new();
        pg.host(&self.db_host)
            .port(self.db_port)
            .user(&self.db_user)
            .dbname(&self.db_name);
        if !self.db_password.is_empty() {
            pg.password(&self.db_password);
        }
        pg
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.db_connection_timeout_secs)
    }

    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            query_timeout: Duration::from_millis(self.query_timeout_ms),
        }
    }
}
