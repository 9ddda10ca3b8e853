use crate::utils::error::Result;
use std::io::Read;

/// 尚未讀取的回應本體，呼叫端自行以 `Read` 消費
#[derive(Debug)]
pub struct ResponseStream {
    inner: reqwest::blocking::Response,
}

impl ResponseStream {
    pub(crate) fn new(inner: reqwest::blocking::Response) -> Self {
        Self { inner }
    }

    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    pub fn content_length(&self) -> Option<u64> {
        self.inner.content_length()
    }

    /// 讀完剩餘本體並轉成字串
    pub fn into_string(mut self) -> Result<String> {
        let mut body = String::new();
        self.inner.read_to_string(&mut body)?;
        Ok(body)
    }
}

impl Read for ResponseStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}
