use std::env;

/// AppConfig
///
/// Runtime configuration for the shell server, loaded once at startup and
/// shared read-only through the application state.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects the log format and the fail-fast rules.
    pub env: Env,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Directory holding the split view chunks (`<chunk>.html`).
    pub chunk_dir: String,
    // Document title prefix rendered into the shell.
    pub site_title: String,
}

/// Env
///
/// Local development or production deployment.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_CHUNK_DIR: &str = "public/chunks";
pub const DEFAULT_SITE_TITLE: &str = "/r/CollegeBasketball Poll";

impl Default for AppConfig {
    /// Safe values for tests; no environment access.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: "127.0.0.1:0".to_string(),
            chunk_dir: DEFAULT_CHUNK_DIR.to_string(),
            site_title: DEFAULT_SITE_TITLE.to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics in production when `CHUNK_DIR` is not set: serving the shell
    /// without the split views would break every lazy route.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let chunk_dir = match env {
            Env::Production => {
                env::var("CHUNK_DIR").expect("FATAL: CHUNK_DIR must be set in production.")
            }
            Env::Local => env::var("CHUNK_DIR").unwrap_or_else(|_| DEFAULT_CHUNK_DIR.to_string()),
        };

        Self {
            env,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            chunk_dir,
            site_title: env::var("SITE_TITLE").unwrap_or_else(|_| DEFAULT_SITE_TITLE.to_string()),
        }
    }
}
