use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(limit_str) = std::env::var("DEPTHGATE_ADMISSION_LIMIT")
            && let Ok(limit) = limit_str.parse::<u32>()
            && limit > 0
        {
            self.admission.limit = limit;
        }

        if let Ok(window_str) = std::env::var("DEPTHGATE_ADMISSION_WINDOW_SECS")
            && let Ok(window) = window_str.parse::<u64>()
            && window > 0
        {
            self.admission.window_secs = window;
        }

        if let Ok(url) = std::env::var("DEPTHGATE_ORACLE_URL")
            && !url.is_empty()
        {
            self.oracle.base_url = url;
            self.oracle.enabled = true;
        }

        if let Ok(model) = std::env::var("DEPTHGATE_ORACLE_MODEL")
            && !model.is_empty()
        {
            self.oracle.model = model;
        }

        if let Ok(key) =
            std::env::var("DEPTHGATE_ORACLE_API_KEY").or_else(|_| std::env::var("OPENAI_API_KEY"))
            && !key.is_empty()
        {
            self.oracle.api_key = Some(key);
        }

        if let Ok(level) = std::env::var("DEPTHGATE_LOG_LEVEL")
            && !level.is_empty()
        {
            self.observability.log_level = level;
        }
    }
}
