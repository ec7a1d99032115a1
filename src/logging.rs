use reqwest::StatusCode;

/// Install the `env_logger` backend. `RUST_LOG` overrides the default `nowify=info`.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("nowify=info"))
        .format_timestamp_millis()
        .init();
}

pub struct ResponseLogger;

impl ResponseLogger {
    /// Record an upstream response that could not be used, body kept on one line
    pub fn log_error(status: StatusCode, body: &str) {
        log::error!("[{status}] {}", body.replace('\n', ""));
    }
}
