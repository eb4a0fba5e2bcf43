use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::Result;

/// 默认 User-Agent
const DEFAULT_USER_AGENT: &str = "ruprobe/0.1";
/// 默认单请求超时
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// 报告中 body 摘录的默认最大字符数
pub const DEFAULT_EXCERPT_LEN: usize = 200;

/// 一次运行共享的会话配置
///
/// 对 runner 来说是只读的：运行过程中不会被修改，
/// cookie 的累积由底层 cookie jar 负责
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub user_agent: String,
    /// 默认请求头，描述符同名键优先
    pub headers: HashMap<String, String>,
    /// 默认 cookie 集，描述符同名键优先
    pub cookies: HashMap<String, String>,
    pub timeout: Duration,
    pub follow_redirects: bool,
    pub excerpt_len: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: HashMap::new(),
            cookies: HashMap::new(),
            timeout: DEFAULT_TIMEOUT,
            follow_redirects: true,
            excerpt_len: DEFAULT_EXCERPT_LEN,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_agent(mut self, ua: &str) -> Self {
        self.user_agent = ua.to_string();
        self
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_cookies(mut self, cookies: HashMap<String, String>) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    pub fn with_excerpt_len(mut self, len: usize) -> Self {
        self.excerpt_len = len;
        self
    }
}

/// 读取 cookie 存储文件（JSON: cookie 名 → 值）
///
/// 文件不存在不算错误，返回 Ok(None)，由调用方决定是否以
/// 未认证状态继续。内容除了 "字符串到字符串的映射" 之外不做校验
pub fn load_cookie_file<P: AsRef<Path>>(path: P) -> Result<Option<HashMap<String, String>>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    let cookies: HashMap<String, String> = serde_json::from_str(&content)?;
    Ok(Some(cookies))
}
