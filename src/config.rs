use std::env;

/// Secret used for caller tokens in dev mode when AUTH_JWT_SECRET is unset.
pub const DEV_JWT_SECRET: &str = "aquivivo-dev-secret-do-not-use-in-production";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    /// HS256 secret for caller tokens (None only if not provided outside dev mode)
    pub jwt_secret: Option<String>,
    /// Accepted `iss` claim; any issuer is accepted when unset
    pub jwt_issuer: Option<String>,
    /// Browser origins allowed to call the API (comma-separated ALLOWED_ORIGINS)
    pub allowed_origins: Vec<String>,
    pub dev_mode: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let dev_mode = env::var("AQUIVIVO_ENV")
            .map(|v| v == "dev" || v == "development")
            .unwrap_or(false);

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let jwt_secret = env::var("AUTH_JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| dev_mode.then(|| DEV_JWT_SECRET.to_string()));

        Self {
            host,
            port,
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "aquivivo.db".to_string()),
            jwt_secret,
            jwt_issuer: env::var("AUTH_ISSUER").ok().filter(|s| !s.is_empty()),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            dev_mode,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
