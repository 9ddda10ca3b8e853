use crate::utils::error::{HttpError, Result};

/// 非同步請求的完成通知。
///
/// 兩個方法都會消耗 `self`，因此每個請求只會觸發其中一個，而且只觸發一次。
/// 回呼在背景 worker 執行緒上執行，不保證順序。
pub trait StringCallback: Send + 'static {
    /// 已讀到回應本體（不論狀態碼）
    fn completed(self: Box<Self>, body: String);

    /// 連線、傳輸或讀取本體失敗
    fn failed(self: Box<Self>, error: HttpError);
}

impl<F> StringCallback for F
where
    F: FnOnce(Result<String>) + Send + 'static,
{
    fn completed(self: Box<Self>, body: String) {
        (*self)(Ok(body))
    }

    fn failed(self: Box<Self>, error: HttpError) {
        (*self)(Err(error))
    }
}

/// 保證回呼恰好觸發一次：若請求在完成前被丟棄（例如用戶端被釋放），
/// 在 Drop 時以 `CancelledError` 通知 `failed`。
pub(crate) struct CallbackGuard {
    callback: Option<Box<dyn StringCallback>>,
}

impl CallbackGuard {
    pub(crate) fn new(callback: Box<dyn StringCallback>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub(crate) fn completed(mut self, body: String) {
        if let Some(callback) = self.callback.take() {
            callback.completed(body);
        }
    }

    pub(crate) fn failed(mut self, error: HttpError) {
        if let Some(callback) = self.callback.take() {
            callback.failed(error);
        }
    }
}

impl Drop for CallbackGuard {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            tracing::warn!("HTTP request dropped before completion");
            callback.failed(HttpError::CancelledError);
        }
    }
}
