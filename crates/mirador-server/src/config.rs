use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub max_body_bytes: usize,
    pub assistant_timeout: Duration,
    pub filters_ttl: Duration,
    pub map_ttl: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            max_body_bytes: 16 * 1024,
            assistant_timeout: mirador_chat::DEFAULT_ASSISTANT_TIMEOUT,
            filters_ttl: Duration::from_secs(30),
            // Map artifacts never change while the process lives.
            map_ttl: Duration::from_secs(900),
        }
    }
}
