use anyhow::{Context, Result};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CODE_LENGTH: usize = 6;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind the HTTP server to, e.g. "0.0.0.0"
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Public base URL used when generating short links, e.g. "https://go.example.com"
    /// Must NOT have a trailing slash.
    pub base_url: String,

    /// Number of characters in a generated short code.
    pub code_length: usize,

    /// How many candidates the allocator draws before giving up.
    pub max_attempts: u32,
}

impl AppConfig {
    /// Load configuration from environment variables (populated by dotenvy before this is called).
    /// Every variable is optional; an empty environment yields [`AppConfig::default`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match var("PORT") {
            Some(p) => p
                .parse::<u16>()
                .context("PORT must be a valid port number (1–65535)")?,
            None => DEFAULT_PORT,
        };

        let code_length = match var("CODE_LENGTH") {
            Some(v) => v
                .parse::<usize>()
                .context("CODE_LENGTH must be a positive integer")?,
            None => DEFAULT_CODE_LENGTH,
        };
        if code_length == 0 {
            anyhow::bail!("CODE_LENGTH must be at least 1");
        }

        let max_attempts = match var("CODE_MAX_ATTEMPTS") {
            Some(v) => v
                .parse::<u32>()
                .context("CODE_MAX_ATTEMPTS must be a positive integer")?,
            None => DEFAULT_MAX_ATTEMPTS,
        };
        if max_attempts == 0 {
            anyhow::bail!("CODE_MAX_ATTEMPTS must be at least 1");
        }

        let base_url = var("BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_owned();

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port,
            base_url,
            code_length,
            max_attempts,
        })
    }

    /// Address string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Public URL for a short code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            base_url: format!("http://localhost:{DEFAULT_PORT}"),
            code_length: DEFAULT_CODE_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}
