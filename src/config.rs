use std::env;

/// Default practitioner PIN when PRACTITIONER_PIN is unset. Development only;
/// deployments must configure their own.
pub const DEFAULT_PRACTITIONER_PIN: &str = "0000";

/// Fixed upstream endpoint for the chat proxy.
pub const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub practitioner_pin: String,
    pub session_ttl_days: i64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Server-held credential injected into outbound Anthropic calls.
    /// None means the proxy endpoint reports a configuration error.
    pub api_key: Option<String>,
    pub messages_url: String,
    pub timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("CROSSING_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3000);

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/crossing".to_string()),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            acquire_timeout_secs: env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        };

        let practitioner_pin = match env::var("PRACTITIONER_PIN") {
            Ok(pin) => pin,
            Err(_) => {
                tracing::warn!(
                    "PRACTITIONER_PIN not set, using insecure default - do not ship this in production"
                );
                DEFAULT_PRACTITIONER_PIN.to_string()
            }
        };

        let security = SecurityConfig {
            practitioner_pin,
            session_ttl_days: env::var("SESSION_TTL_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        };

        let upstream = UpstreamConfig {
            api_key: non_empty(env::var("ANTHROPIC_API_KEY").ok()),
            messages_url: env::var("ANTHROPIC_MESSAGES_URL")
                .unwrap_or_else(|_| ANTHROPIC_MESSAGES_URL.to_string()),
            timeout_secs: env::var("ANTHROPIC_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
        };

        Self { port, database, security, upstream }
    }
}

/// A blank key in the environment counts as unconfigured.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_api_key_counts_as_unconfigured() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("".to_string())), None);
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(Some("sk-key".to_string())), Some("sk-key".to_string()));
    }
}
