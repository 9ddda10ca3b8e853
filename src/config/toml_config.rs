use crate::config::HttpConfig;
use crate::utils::error::{HttpError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // 固定樣式，編譯不會失敗
        Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern")
    })
}

impl HttpConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HttpError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，解析後立即驗證
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        let config: HttpConfig =
            toml::from_str(&processed_content).map_err(|e| HttpError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;

        config.validate()?;
        Ok(config)
    }
}

/// 替換環境變數 (例如 ${HTTP_USER_AGENT})，未設定的變數保持原樣
fn substitute_env_vars(content: &str) -> String {
    env_var_pattern()
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
}
