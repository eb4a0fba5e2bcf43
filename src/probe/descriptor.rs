use std::collections::HashMap;
use std::time::Duration;

use crate::http::types::Method;
use crate::{Result, RuprobeError};

/// 一次探测请求的完整描述
///
/// 构造之后不可变。name 用于报告输出，url 在构造时校验——
/// 残缺的描述符属于调用方 bug，是整个库里唯一直接抛错的路径
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub name: String,
    pub method: Method,
    pub url: String,
    pub query_params: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub cookies: HashMap<String, String>,
    /// 覆盖会话默认超时（秒数必须为正）
    pub timeout: Option<Duration>,
    /// 覆盖会话默认的重定向策略
    pub follow_redirects: Option<bool>,
}

impl RequestDescriptor {
    pub fn new(name: &str, method: &str, url: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(RuprobeError::InvalidDescriptor(
                "descriptor name must not be empty".to_string(),
            ));
        }
        if url.trim().is_empty() {
            return Err(RuprobeError::InvalidDescriptor(format!(
                "descriptor '{}' has no URL",
                name
            )));
        }
        // 提前校验 URL，跑批中途才发现格式错误没有意义
        url::Url::parse(url)?;

        Ok(Self {
            name: name.to_string(),
            method: method.parse()?,
            url: url.to_string(),
            query_params: HashMap::new(),
            headers: HashMap::new(),
            cookies: HashMap::new(),
            timeout: None,
            follow_redirects: None,
        })
    }

    pub fn get(name: &str, url: &str) -> Result<Self> {
        Self::new(name, "GET", url)
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query_params.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_cookie(mut self, key: &str, value: &str) -> Self {
        self.cookies.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(RuprobeError::InvalidDescriptor(format!(
                "descriptor '{}' has a zero timeout",
                self.name
            )));
        }
        self.timeout = Some(timeout);
        Ok(self)
    }

    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = Some(follow);
        self
    }
}
