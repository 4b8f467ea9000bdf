use std::env;

/// Application settings, read from the environment (a `.env` file is
/// loaded by the binaries before this runs)
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub api_prefix: String,
    pub cors_origins: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            host: "127.0.0.1".to_string(),
            port: 3000,
            api_prefix: "/api/v1".to_string(),
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Settings::default();

        Settings {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            api_prefix: env::var("API_PREFIX").unwrap_or(defaults.api_prefix),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.bind_addr(), "127.0.0.1:3000");
        assert_eq!(settings.api_prefix, "/api/v1");
        assert_eq!(settings.cors_origins.len(), 2);
    }
}
