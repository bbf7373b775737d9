/// Endpoint constants
pub mod urls {
    pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";
    pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
}

/// Environment variable names read by the router and the config loader
pub mod env_vars {
    pub const OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";
    pub const PUBLIC_APP_URL: &str = "PUBLIC_APP_URL";
    pub const PUBLIC_APP_NAME: &str = "PUBLIC_APP_NAME";
}

/// Attribution headers understood by OpenRouter
pub mod headers {
    pub const HTTP_REFERER: &str = "HTTP-Referer";
    pub const X_TITLE: &str = "X-Title";
}

/// Model catalogue ids and provider-qualified identifiers for the built-in routing table
pub mod models {
    pub const PROVIDER_OPENROUTER: &str = "openrouter";

    pub const CLASSIFIER_ID: &str = "classifier";
    pub const DEEPSEEK_V3_ID: &str = "deepseek-v3";
    pub const GEMINI_FLASH_ID: &str = "gemini-flash";
    pub const CLAUDE_HAIKU_ID: &str = "claude-haiku";
    pub const CLAUDE_SONNET_ID: &str = "claude-sonnet";

    pub mod openrouter {
        pub const DEEPSEEK_CHAT_V3: &str = "deepseek/deepseek-chat-v3-0324";
        pub const GEMINI_2_0_FLASH: &str = "google/gemini-2.0-flash-001";
        pub const CLAUDE_3_5_HAIKU: &str = "anthropic/claude-3.5-haiku";
        pub const CLAUDE_3_5_SONNET: &str = "anthropic/claude-3.5-sonnet";
    }
}

/// Limits applied when validating model entries
pub mod limits {
    /// Upper bound for `max_tokens` on any configured model
    pub const MAX_TOKENS_CAP: u32 = 100_000;
    /// Completion budget for the classifier model
    pub const CLASSIFIER_MAX_TOKENS: u32 = 256;
    /// Completion budget for general generation models
    pub const DEFAULT_MAX_TOKENS: u32 = 8192;
}

/// Message role constants to avoid hardcoding strings
pub mod message_roles {
    pub const SYSTEM: &str = "system";
    pub const USER: &str = "user";
    pub const ASSISTANT: &str = "assistant";
}

/// Configuration file names and locations
pub mod config_files {
    pub const CONFIG_FILE_NAME: &str = "studyrouter.toml";
    pub const CONFIG_DIR_NAME: &str = ".studyrouter";
}
