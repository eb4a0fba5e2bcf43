use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuprobeError {
    #[error("请求超时: {0}")]
    TransportTimeout(String),

    #[error("连接失败: {0}")]
    TransportConnection(String),

    #[error("传输错误: {0}")]
    TransportOther(String),

    #[error("无效的探测描述: {0}")]
    InvalidDescriptor(String),

    #[error("探测计划错误: {0}")]
    PlanError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL 解析错误: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

impl RuprobeError {
    /// 将底层 reqwest 错误映射为传输层错误
    ///
    /// 超时、连接失败(DNS/TCP/TLS)和其他传输错误需要区分，
    /// 分类器依赖这个区分产生不同的 Classification
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RuprobeError::TransportTimeout(err.to_string())
        } else if err.is_connect() {
            RuprobeError::TransportConnection(err.to_string())
        } else {
            RuprobeError::TransportOther(err.to_string())
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RuprobeError::TransportTimeout(_))
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, RuprobeError::TransportConnection(_))
    }
}

// Add conversion from anyhow::Error
impl From<anyhow::Error> for RuprobeError {
    fn from(err: anyhow::Error) -> Self {
        RuprobeError::Other(err.to_string())
    }
}

/// Result type for ruprobe crate
pub type Result<T> = std::result::Result<T, RuprobeError>;
