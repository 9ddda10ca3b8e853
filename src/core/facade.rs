//! 行程層級的單例用戶端與對應的靜態呼叫。
//!
//! 第一次使用時以預設（或 [`Http::install`] 安裝的）設定建立，之後所有呼叫
//! 共用同一個 [`Http`]。

use crate::config::HttpConfig;
use crate::core::client::Http;
use crate::domain::model::ResponseStream;
use crate::domain::ports::StringCallback;
use crate::utils::error::{HttpError, Result};
use std::sync::OnceLock;

pub use crate::core::query::concat_url;

static INSTANCE: OnceLock<Http> = OnceLock::new();

impl Http {
    /// 取得全域用戶端，必要時以預設設定建立
    pub fn instance() -> Result<&'static Http> {
        if let Some(http) = INSTANCE.get() {
            return Ok(http);
        }

        let http = Http::new(HttpConfig::default())?;
        // 併發初始化時只保留先完成的那一個
        Ok(INSTANCE.get_or_init(|| http))
    }

    /// 在第一次使用前替全域用戶端指定設定
    pub fn install(config: HttpConfig) -> Result<()> {
        if INSTANCE.get().is_some() {
            return Err(HttpError::AlreadyInitializedError);
        }

        let http = Http::new(config)?;
        INSTANCE
            .set(http)
            .map_err(|_| HttpError::AlreadyInitializedError)
    }
}

fn global() -> Option<&'static Http> {
    match Http::instance() {
        Ok(http) => Some(http),
        Err(e) => {
            tracing::error!("Failed to initialize global HTTP client: {}", e);
            None
        }
    }
}

pub fn get(url: &str) -> String {
    global().map(|http| http.get(url)).unwrap_or_default()
}

pub fn get_with_params<I, K, V>(url: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    global()
        .map(|http| http.get_with_params(url, params))
        .unwrap_or_default()
}

pub fn get_async<I, K, V, C>(url: &str, params: I, callback: C)
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
    C: StringCallback,
{
    match Http::instance() {
        Ok(http) => http.get_async(url, params, callback),
        Err(e) => Box::new(callback).failed(e),
    }
}

pub fn post<I, K, V>(url: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    global().map(|http| http.post(url, params)).unwrap_or_default()
}

pub fn post_async<I, K, V, C>(url: &str, params: I, callback: C)
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
    C: StringCallback,
{
    match Http::instance() {
        Ok(http) => http.post_async(url, params, callback),
        Err(e) => Box::new(callback).failed(e),
    }
}

pub fn post_body(url: &str, body: impl Into<String>) -> String {
    global()
        .map(|http| http.post_body(url, body))
        .unwrap_or_default()
}

pub fn post_body_with_type(url: &str, body: impl Into<String>, content_type: &str) -> String {
    global()
        .map(|http| http.post_body_with_type(url, body, content_type))
        .unwrap_or_default()
}

pub fn post_body_stream(url: &str, body: impl Into<String>) -> Option<ResponseStream> {
    global().and_then(|http| http.post_body_stream(url, body))
}
