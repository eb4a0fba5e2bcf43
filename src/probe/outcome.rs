use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::RuprobeError;
use crate::http::Response;
use crate::probe::descriptor::RequestDescriptor;

/// 请求结局的诊断分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Success,
    ClientError,
    ServerError,
    Timeout,
    ConnectionError,
    UnknownError,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Success => "success",
            Classification::ClientError => "client_error",
            Classification::ServerError => "server_error",
            Classification::Timeout => "timeout",
            Classification::ConnectionError => "connection_error",
            Classification::UnknownError => "unknown_error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Classification::Success)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 纯分类函数
///
/// 传输层失败永远优先于状态码（此时状态码必然缺失）。
/// 2xx/3xx 算成功——重定向对探测来说是有效信息而不是失败。
/// [100,599] 之外以及 1xx 的状态码归入 UnknownError
pub fn classify(status: Option<u16>, transport: Option<&RuprobeError>) -> Classification {
    if let Some(err) = transport {
        return if err.is_timeout() {
            Classification::Timeout
        } else if err.is_connection() {
            Classification::ConnectionError
        } else {
            Classification::UnknownError
        };
    }

    match status {
        Some(code) => match code {
            200..=399 => Classification::Success,
            400..=499 => Classification::ClientError,
            500..=599 => Classification::ServerError,
            _ => Classification::UnknownError,
        },
        None => Classification::UnknownError,
    }
}

/// 单个描述符执行一次之后的不可变记录
///
/// 不变式：status 和 error 恰好一个存在——请求要么抵达服务器
/// （有状态码），要么死在传输层（有错误详情）。body 的 JSON
/// 解码失败不破坏这条不变式，只把 json_parsed 置为 false
#[derive(Debug, Clone)]
pub struct Outcome {
    pub name: String,
    pub method: String,
    pub url: String,
    pub classification: Classification,
    pub status: Option<u16>,
    pub elapsed: Duration,
    /// 跟随重定向后的最终 URL，传输失败时缺失
    pub final_url: Option<String>,
    /// body 前 N 个字符（N 来自会话配置，默认 200）
    pub body_excerpt: String,
    pub json_parsed: bool,
    /// 完整的解析结构，仅在分类为 success 且解码成功时存在，
    /// 永远不做截断
    pub json: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl Outcome {
    /// 从收到的响应构造结局
    ///
    /// 无论分类如何都尝试 JSON 解码，解码失败不改变 HTTP 层的分类
    pub fn from_response(
        descriptor: &RequestDescriptor,
        response: &Response,
        excerpt_len: usize,
    ) -> Self {
        let classification = classify(Some(response.status.code()), None);

        let parsed: Option<serde_json::Value> = serde_json::from_str(&response.body).ok();
        let json_parsed = parsed.is_some();
        let json = if classification.is_success() {
            parsed
        } else {
            None
        };

        Self {
            name: descriptor.name.clone(),
            method: descriptor.method.to_string(),
            url: descriptor.url.clone(),
            classification,
            status: Some(response.status.code()),
            elapsed: response.duration,
            final_url: Some(response.final_url.clone()),
            body_excerpt: excerpt(&response.body, excerpt_len),
            json_parsed,
            json,
            error: None,
        }
    }

    /// 从传输层失败构造结局，没有状态码可言
    pub fn from_failure(
        descriptor: &RequestDescriptor,
        error: &RuprobeError,
        elapsed: Duration,
    ) -> Self {
        Self {
            name: descriptor.name.clone(),
            method: descriptor.method.to_string(),
            url: descriptor.url.clone(),
            classification: classify(None, Some(error)),
            status: None,
            elapsed,
            final_url: None,
            body_excerpt: String::new(),
            json_parsed: false,
            json: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.classification.is_success()
    }
}

/// 按字符截断，避免切在 UTF-8 边界中间
fn excerpt(body: &str, max_chars: usize) -> String {
    body.chars().take(max_chars).collect()
}
