use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::Result;
use crate::probe::{RequestDescriptor, SessionConfig, session};

/// 探测计划文件的顶层结构
///
/// ```toml
/// [session]
/// user_agent = "Mozilla/5.0 ..."
/// timeout_secs = 15
/// cookie_file = "cookies.json"
///
/// [[probes]]
/// name = "login-redirect"
/// url = "https://example.com/login"
/// follow_redirects = false
/// ```
#[derive(Debug, Deserialize, Default)]
pub struct ProbePlan {
    #[serde(default)]
    pub session: SessionSection,

    #[serde(default)]
    pub probes: Vec<ProbeEntry>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SessionSection {
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
    pub follow_redirects: Option<bool>,
    pub excerpt_len: Option<usize>,

    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// cookie 存储文件路径，相对路径以计划文件所在目录为基准
    pub cookie_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct ProbeEntry {
    pub name: String,
    pub url: String,

    /// 缺省 GET
    pub method: Option<String>,

    #[serde(default)]
    pub params: HashMap<String, String>,

    #[serde(default)]
    pub headers: HashMap<String, String>,

    #[serde(default)]
    pub cookies: HashMap<String, String>,

    pub timeout_secs: Option<u64>,
    pub follow_redirects: Option<bool>,
}

impl ProbePlan {
    /// 由 [session] 段构建会话配置
    ///
    /// cookie 文件缺失不算错误，打一条警告后以未认证状态继续
    pub fn build_session(&self, base_dir: &Path) -> Result<SessionConfig> {
        let mut config = SessionConfig::new();

        if let Some(ua) = &self.session.user_agent {
            config = config.with_user_agent(ua);
        }
        if let Some(secs) = self.session.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(follow) = self.session.follow_redirects {
            config = config.with_follow_redirects(follow);
        }
        if let Some(len) = self.session.excerpt_len {
            config = config.with_excerpt_len(len);
        }
        for (key, value) in &self.session.headers {
            config = config.with_header(key, value);
        }

        if let Some(cookie_file) = &self.session.cookie_file {
            let path = if cookie_file.is_absolute() {
                cookie_file.clone()
            } else {
                base_dir.join(cookie_file)
            };
            match session::load_cookie_file(&path)? {
                Some(cookies) => config = config.with_cookies(cookies),
                None => warn!(path = %path.display(), "cookie file not found, proceeding unauthenticated"),
            }
        }

        Ok(config)
    }

    /// 把 [[probes]] 条目转换为描述符序列，顺序保留
    pub fn descriptors(&self) -> Result<Vec<RequestDescriptor>> {
        self.probes.iter().map(|entry| entry.to_descriptor()).collect()
    }
}

impl ProbeEntry {
    pub fn to_descriptor(&self) -> Result<RequestDescriptor> {
        let method = self.method.as_deref().unwrap_or("GET");
        let mut descriptor = RequestDescriptor::new(&self.name, method, &self.url)?;

        for (key, value) in &self.params {
            descriptor = descriptor.with_query(key, value);
        }
        for (key, value) in &self.headers {
            descriptor = descriptor.with_header(key, value);
        }
        for (key, value) in &self.cookies {
            descriptor = descriptor.with_cookie(key, value);
        }
        if let Some(secs) = self.timeout_secs {
            descriptor = descriptor.with_timeout(Duration::from_secs(secs))?;
        }
        if let Some(follow) = self.follow_redirects {
            descriptor = descriptor.with_follow_redirects(follow);
        }

        Ok(descriptor)
    }
}
