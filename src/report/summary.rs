use std::time::Duration;

use crate::probe::{Classification, Outcome};

/// 一次运行的汇总统计
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total: usize,
    pub success: usize,
    pub client_error: usize,
    pub server_error: usize,
    pub timeout: usize,
    pub connection_error: usize,
    pub unknown_error: usize,
    pub total_duration: Duration,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        let count = |c: Classification| outcomes.iter().filter(|o| o.classification == c).count();

        Self {
            total: outcomes.len(),
            success: count(Classification::Success),
            client_error: count(Classification::ClientError),
            server_error: count(Classification::ServerError),
            timeout: count(Classification::Timeout),
            connection_error: count(Classification::ConnectionError),
            unknown_error: count(Classification::UnknownError),
            total_duration: outcomes.iter().map(|o| o.elapsed).sum(),
        }
    }

    /// 没抵达服务器的探测数（传输层失败）
    pub fn unreachable(&self) -> usize {
        self.timeout + self.connection_error + self.unknown_error
    }

    /// 抵达了服务器但被拒绝或出错的探测数
    pub fn rejected(&self) -> usize {
        self.client_error + self.server_error
    }
}
