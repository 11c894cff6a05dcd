use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub runner: RunnerConfig,
    pub store: StoreConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    pub base_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
    // Fallback key when the session has none; usually left unset and
    // supplied per session through the settings form.
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RunnerConfig {
    pub timeout_secs: u64,
    pub python_bin: String,
    pub node_bin: String,
    // Where source temp files are written; system temp dir when unset.
    pub scratch_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    pub max_history_messages: usize,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
