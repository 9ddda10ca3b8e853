use crate::config::HttpConfig;
use crate::core::query::{concat_url, encode_form};
use crate::domain::model::ResponseStream;
use crate::domain::ports::{CallbackGuard, StringCallback};
use crate::utils::error::{HttpError, Result};
use crate::utils::validation::Validate;
use reqwest::blocking::{Client as BlockingClient, RequestBuilder as BlockingRequest};
use reqwest::header::CONTENT_TYPE;
use std::sync::OnceLock;
use tokio::runtime::Runtime;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP 用戶端握柄。
///
/// 同步呼叫走 blocking client，回呼呼叫走 async client 並在自有的 tokio
/// runtime 上執行。失敗一律記錄後吞掉：字串呼叫回傳 `""`，串流呼叫回傳
/// `None`，回呼呼叫觸發 `failed`。
///
/// 建立與釋放都可以在 async context 中進行；blocking client 在第一次同步
/// 呼叫時才建立，同步呼叫本身仍不可在 async context 中使用。
#[derive(Debug)]
pub struct Http {
    config: HttpConfig,
    blocking: OnceLock<BlockingClient>,
    client: reqwest::Client,
    // 只在 Drop 時取出
    runtime: Option<Runtime>,
}

impl Http {
    pub fn new(config: HttpConfig) -> Result<Self> {
        config.validate()?;

        let client = build_async_client(&config)?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(config.worker_threads)
            .thread_name("http-kit-worker")
            .enable_all()
            .build()?;

        if config.trust_all_certificates {
            tracing::debug!("TLS certificate and hostname verification disabled");
        }
        tracing::debug!(
            "HTTP client ready (connect timeout {:?}, request timeout {:?}, {} workers)",
            config.connect_timeout(),
            config.request_timeout(),
            config.worker_threads
        );

        Ok(Self {
            config,
            blocking: OnceLock::new(),
            client,
            runtime: Some(runtime),
        })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    pub fn get(&self, url: &str) -> String {
        self.execute(|client| client.get(url))
    }

    pub fn get_with_params<I, K, V>(&self, url: &str, params: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let full_url = concat_url(url, params);
        self.execute(|client| client.get(full_url))
    }

    pub fn get_async<I, K, V, C>(&self, url: &str, params: I, callback: C)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
        C: StringCallback,
    {
        self.enqueue(self.client.get(concat_url(url, params)), callback);
    }

    /// 以表單編碼本體送出 POST
    pub fn post<I, K, V>(&self, url: &str, params: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let body = encode_form(params);
        self.execute(|client| {
            client
                .post(url)
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(body)
        })
    }

    pub fn post_async<I, K, V, C>(&self, url: &str, params: I, callback: C)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
        C: StringCallback,
    {
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(encode_form(params));
        self.enqueue(request, callback);
    }

    /// 原始字串本體，不帶 Content-Type
    pub fn post_body(&self, url: &str, body: impl Into<String>) -> String {
        let body = body.into();
        self.execute(|client| client.post(url).body(body))
    }

    pub fn post_body_with_type(
        &self,
        url: &str,
        body: impl Into<String>,
        content_type: &str,
    ) -> String {
        let body = body.into();
        self.execute(|client| client.post(url).header(CONTENT_TYPE, content_type).body(body))
    }

    /// 送出原始本體並交回未讀取的回應
    pub fn post_body_stream(&self, url: &str, body: impl Into<String>) -> Option<ResponseStream> {
        let body = body.into();
        match self.send(|client| client.post(url).body(body)) {
            Ok(response) => Some(ResponseStream::new(response)),
            Err(e) => {
                tracing::error!("HTTP request to {} failed: {}", url, e);
                None
            }
        }
    }

    fn blocking_client(&self) -> Result<&BlockingClient> {
        if let Some(client) = self.blocking.get() {
            return Ok(client);
        }

        let client = build_blocking_client(&self.config)?;
        Ok(self.blocking.get_or_init(|| client))
    }

    fn send<F>(&self, build: F) -> Result<reqwest::blocking::Response>
    where
        F: FnOnce(&BlockingClient) -> BlockingRequest,
    {
        let client = self.blocking_client()?;
        let request = build(client).build()?;
        tracing::debug!("{} {}", request.method(), request.url());

        let response = client.execute(request)?;
        if !response.status().is_success() {
            tracing::warn!("{} responded with status {}", response.url(), response.status());
        }
        Ok(response)
    }

    fn execute<F>(&self, build: F) -> String
    where
        F: FnOnce(&BlockingClient) -> BlockingRequest,
    {
        let result = self
            .send(build)
            .and_then(|response| response.text().map_err(HttpError::from));

        match result {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("HTTP request failed: {}", e);
                String::new()
            }
        }
    }

    fn enqueue<C: StringCallback>(&self, request: reqwest::RequestBuilder, callback: C) {
        let guard = CallbackGuard::new(Box::new(callback));
        let Some(runtime) = self.runtime.as_ref() else {
            // 只會在 Drop 之後發生；guard 會觸發 failed
            return;
        };

        runtime.spawn(async move {
            let result = dispatch(request).await;
            // 回呼可能會阻塞，移到 blocking 執行緒池
            tokio::task::spawn_blocking(move || match result {
                Ok(body) => guard.completed(body),
                Err(e) => {
                    tracing::error!("HTTP request failed: {}", e);
                    guard.failed(e)
                }
            });
        });
    }
}

impl Drop for Http {
    fn drop(&mut self) {
        // 不等待進行中的請求；被取消的回呼由 CallbackGuard 通知 failed
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

async fn dispatch(request: reqwest::RequestBuilder) -> Result<String> {
    let response = request.send().await?;
    tracing::debug!("{} answered {}", response.url(), response.status());
    if !response.status().is_success() {
        tracing::warn!("{} responded with status {}", response.url(), response.status());
    }
    Ok(response.text().await?)
}

fn build_blocking_client(config: &HttpConfig) -> Result<BlockingClient> {
    let client = BlockingClient::builder()
        .connect_timeout(config.connect_timeout())
        .timeout(config.request_timeout())
        .user_agent(config.user_agent.as_str())
        .danger_accept_invalid_certs(config.trust_all_certificates)
        .build()?;
    Ok(client)
}

fn build_async_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .connect_timeout(config.connect_timeout())
        .timeout(config.request_timeout())
        .user_agent(config.user_agent.as_str())
        .danger_accept_invalid_certs(config.trust_all_certificates)
        .build()?;
    Ok(client)
}
