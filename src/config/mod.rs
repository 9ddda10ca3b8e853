#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const MAX_TIMEOUT_MS: u64 = 600_000;
pub const DEFAULT_WORKER_THREADS: usize = 2;
pub const MAX_WORKER_THREADS: usize = 256;
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// 用戶端設定，所有欄位在 TOML 中皆可省略
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub write_timeout_ms: u64,
    /// 接受任何伺服器憑證與主機名稱（不安全，預設開啟）
    pub trust_all_certificates: bool,
    pub user_agent: String,
    /// 回呼模式使用的背景執行緒數
    pub worker_threads: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: DEFAULT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_TIMEOUT_MS,
            write_timeout_ms: DEFAULT_TIMEOUT_MS,
            trust_all_certificates: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            worker_threads: DEFAULT_WORKER_THREADS,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// reqwest 沒有獨立的寫入逾時，讀寫逾時合併為整體請求逾時
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms.saturating_add(self.write_timeout_ms))
    }

    pub fn with_timeouts(mut self, connect_ms: u64, read_ms: u64, write_ms: u64) -> Self {
        self.connect_timeout_ms = connect_ms;
        self.read_timeout_ms = read_ms;
        self.write_timeout_ms = write_ms;
        self
    }

    pub fn with_trust_all_certificates(mut self, trust_all: bool) -> Self {
        self.trust_all_certificates = trust_all;
        self
    }
}

impl Validate for HttpConfig {
    fn validate(&self) -> Result<()> {
        validate_range("connect_timeout_ms", self.connect_timeout_ms, 1, MAX_TIMEOUT_MS)?;
        validate_range("read_timeout_ms", self.read_timeout_ms, 1, MAX_TIMEOUT_MS)?;
        validate_range("write_timeout_ms", self.write_timeout_ms, 1, MAX_TIMEOUT_MS)?;
        validate_range("worker_threads", self.worker_threads, 1, MAX_WORKER_THREADS)?;
        validate_non_empty_string("user_agent", &self.user_agent)?;
        Ok(())
    }
}
