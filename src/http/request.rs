use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap as Headers, HeaderName, HeaderValue};

use crate::Result;
use crate::RuprobeError;
use crate::http::types::Method;

/// 合并完成、随时可以发出的请求
///
/// 描述符和会话配置的合并结果：query 参数已并入 URL，
/// headers/cookies 已折叠为 HeaderMap，超时和重定向策略已定
pub struct ProbeRequest {
    pub method: Method,
    pub url: url::Url,
    pub headers: Headers,
    pub timeout: Duration,
    pub follow_redirects: bool,
}

impl ProbeRequest {
    pub fn new(
        method: Method,
        url: &str,
        query_params: &HashMap<String, String>,
        timeout: Duration,
        follow_redirects: bool,
    ) -> Result<Self> {
        let url = if query_params.is_empty() {
            url::Url::parse(url)?
        } else {
            // BTreeMap 保证参数顺序稳定，便于日志对比
            let sorted: std::collections::BTreeMap<_, _> = query_params.iter().collect();
            url::Url::parse_with_params(url, sorted)?
        };

        Ok(Self {
            method,
            url,
            headers: Headers::new(),
            timeout,
            follow_redirects,
        })
    }

    fn insert_header(&mut self, key: &str, value: &str) -> Result<()> {
        let name: HeaderName = key
            .parse()
            .map_err(|_| RuprobeError::InvalidDescriptor(format!("invalid header name: {}", key)))?;
        let value: HeaderValue = value.parse().map_err(|_| {
            RuprobeError::InvalidDescriptor(format!("invalid header value for {}", key))
        })?;
        self.headers.insert(name, value);
        Ok(())
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Result<Self> {
        self.insert_header(key, value)?;
        Ok(self)
    }

    /// 将 cookie 集折叠为一个 Cookie 头
    ///
    /// 按 key 排序，保证同一输入产生相同的头部
    pub fn with_cookies(mut self, cookies: &HashMap<String, String>) -> Result<Self> {
        if cookies.is_empty() {
            return Ok(self);
        }
        let sorted: std::collections::BTreeMap<_, _> = cookies.iter().collect();
        let header = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("; ");
        self.insert_header("Cookie", &header)?;
        Ok(self)
    }
}
