use std::collections::HashMap;

use tracing::debug;

use crate::Result;
use crate::http::{Client, ProbeRequest};
use crate::probe::descriptor::RequestDescriptor;
use crate::probe::outcome::Outcome;
use crate::probe::session::SessionConfig;

/// 顺序执行一批探测描述符
///
/// 严格串行，不做并发。每个描述符的失败都折叠进 Outcome，
/// 单个端点挂掉不会中断整个批次。结果序列与输入顺序一致，
/// 所有权在 run 返回时移交给调用方
pub struct ProbeRunner {
    client: Client,
    session: SessionConfig,
}

impl ProbeRunner {
    pub fn new(session: SessionConfig) -> Self {
        Self {
            client: Client::new(&session.user_agent),
            session,
        }
    }

    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    /// 执行整个批次，每个描述符产出一个 Outcome
    pub async fn run(&self, descriptors: &[RequestDescriptor]) -> Vec<Outcome> {
        self.run_inner(descriptors, false).await
    }

    /// 同 run，但在第一个 success 分类之后停止
    ///
    /// 用于 "逐个尝试候选 URL，哪个通了用哪个" 的探测场景，
    /// 返回的序列在命中处截断
    pub async fn run_until_success(&self, descriptors: &[RequestDescriptor]) -> Vec<Outcome> {
        self.run_inner(descriptors, true).await
    }

    async fn run_inner(&self, descriptors: &[RequestDescriptor], stop_on_success: bool) -> Vec<Outcome> {
        let mut outcomes = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            let outcome = self.probe_one(descriptor).await;
            debug!(
                name = %outcome.name,
                classification = %outcome.classification,
                status = ?outcome.status,
                "probe finished"
            );
            let hit = stop_on_success && outcome.is_success();
            outcomes.push(outcome);
            if hit {
                break;
            }
        }

        outcomes
    }

    /// 执行单个探测
    async fn probe_one(&self, descriptor: &RequestDescriptor) -> Outcome {
        let start = std::time::Instant::now();

        let request = match self.build_request(descriptor) {
            Ok(req) => req,
            Err(e) => return Outcome::from_failure(descriptor, &e, start.elapsed()),
        };

        match self.client.execute(request).await {
            Ok(response) => {
                Outcome::from_response(descriptor, &response, self.session.excerpt_len)
            }
            Err(e) => Outcome::from_failure(descriptor, &e, start.elapsed()),
        }
    }

    /// 把描述符和会话默认值合并为可发出的请求
    ///
    /// 同名键冲突时描述符一方获胜
    fn build_request(&self, descriptor: &RequestDescriptor) -> Result<ProbeRequest> {
        let timeout = descriptor.timeout.unwrap_or(self.session.timeout);
        let follow = descriptor
            .follow_redirects
            .unwrap_or(self.session.follow_redirects);

        let mut request = ProbeRequest::new(
            descriptor.method,
            &descriptor.url,
            &descriptor.query_params,
            timeout,
            follow,
        )?;

        let headers = merge(&self.session.headers, &descriptor.headers);
        for (key, value) in &headers {
            request = request.with_header(key, value)?;
        }

        let cookies = merge(&self.session.cookies, &descriptor.cookies);
        request.with_cookies(&cookies)
    }
}

fn merge(
    defaults: &HashMap<String, String>,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut merged = defaults.clone();
    for (k, v) in overrides {
        merged.insert(k.clone(), v.clone());
    }
    merged
}
