use std::env;

// ============================================================================
// Configuration
// ============================================================================
//
// Read once at startup and passed into constructors. Nothing here is
// consulted as ambient global state after boot.
//
// ============================================================================

#[derive(Clone, Debug)]
pub struct Config {
    /// "scylla" (default) or "memory" for running without a database node.
    pub store_backend: String,
    pub scylla_node: String,
    pub keyspace: String,
    pub kafka_brokers: String,
    pub kafka_topic: String,
    pub http_port: u16,
    pub metrics_port: u16,
    pub auth_username: String,
    pub auth_password: String,
    pub token_ttl_secs: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            store_backend: var_or("COMPANY_STORE", "scylla"),
            scylla_node: var_or("COMPANY_SCYLLA_NODE", "127.0.0.1:9042"),
            keyspace: var_or("COMPANY_KEYSPACE", "company_ks"),
            kafka_brokers: var_or("COMPANY_KAFKA_BROKERS", "127.0.0.1:9092"),
            kafka_topic: var_or("COMPANY_KAFKA_TOPIC", "company-events"),
            http_port: parse_with(env::var("COMPANY_HTTP_PORT").ok(), 8080),
            metrics_port: parse_with(env::var("COMPANY_METRICS_PORT").ok(), 9090),
            auth_username: var_or("COMPANY_AUTH_USERNAME", "admin"),
            auth_password: var_or("COMPANY_AUTH_PASSWORD", "admin"),
            token_ttl_secs: parse_with(env::var("COMPANY_TOKEN_TTL_SECS").ok(), 3600),
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_with<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_falls_back_on_missing_or_garbage() {
        assert_eq!(parse_with::<u16>(None, 8080), 8080);
        assert_eq!(parse_with::<u16>(Some("not-a-port".to_string()), 8080), 8080);
        assert_eq!(parse_with::<u16>(Some("9000".to_string()), 8080), 9000);
    }

    #[test]
    fn from_env_has_usable_defaults() {
        let config = Config::from_env();
        assert!(!config.scylla_node.is_empty());
        assert!(!config.kafka_topic.is_empty());
        assert!(config.http_port > 0);
        assert!(config.token_ttl_secs > 0);
    }
}
