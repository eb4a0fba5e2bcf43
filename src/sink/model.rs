use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::probe::{Classification, Outcome};

/// 探测产物的持久化记录
///
/// 不含完整 body，只留元数据——sink 面向后续工具消费，
/// 原始 body 摘录留在内存中的 Outcome 里
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredRecord {
    /// 唯一 ID (UUID)
    pub id: String,

    /// 记录时间
    pub timestamp: DateTime<Utc>,

    pub name: String,
    pub method: String,
    pub url: String,

    pub classification: Classification,

    /// 状态码，传输层失败时缺失
    pub status: Option<u16>,

    /// 请求耗时 (毫秒)
    pub duration_ms: u64,
}

impl DiscoveredRecord {
    pub fn from_outcome(outcome: &Outcome) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            name: outcome.name.clone(),
            method: outcome.method.clone(),
            url: outcome.url.clone(),
            classification: outcome.classification,
            status: outcome.status,
            duration_ms: outcome.elapsed.as_millis() as u64,
        }
    }
}
