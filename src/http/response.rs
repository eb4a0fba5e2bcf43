use crate::Result;
use crate::http::types::Status;
use reqwest::header::HeaderMap as Headers;
use std::time::Duration;

pub struct Response {
    pub status: Status,
    pub headers: Headers,
    /// 跟随重定向之后实际抵达的 URL
    pub final_url: String,
    pub body: String,
    pub duration: Duration,
}

impl Response {
    pub fn new(
        status: u16,
        headers: Headers,
        final_url: String,
        body: String,
        duration: Duration,
    ) -> Result<Self> {
        Ok(Self {
            status: Status::new(status)?,
            headers,
            final_url,
            body,
            duration,
        })
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_redirect(&self) -> bool {
        self.status.is_redirect()
    }

    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}
