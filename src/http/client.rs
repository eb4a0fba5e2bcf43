use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::redirect::Policy;

use crate::Result;
use crate::RuprobeError;
use crate::http::request::ProbeRequest;
use crate::http::response::Response;
use crate::http::types::Method;

const MAX_REDIRECTS: usize = 10;

/// HTTP 客户端包装
///
/// 内部持有两个 reqwest 客户端（跟随/不跟随重定向），构建一次复用整个批次。
/// 两者共享同一个 cookie jar，服务端通过 Set-Cookie 下发的 cookie
/// 会在一次运行内持续累积，这是有意保留的副作用
#[derive(Clone)]
pub struct Client {
    follow: reqwest::Client,
    no_follow: reqwest::Client,
}

impl Default for Client {
    fn default() -> Self {
        Self::new("ruprobe/0.1")
    }
}

impl Client {
    pub fn new(user_agent: &str) -> Self {
        let jar = Arc::new(Jar::default());

        let build = |policy: Policy| {
            reqwest::Client::builder()
                .user_agent(user_agent.to_string())
                .cookie_provider(Arc::clone(&jar))
                .redirect(policy)
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client")
        };

        Self {
            follow: build(Policy::limited(MAX_REDIRECTS)),
            no_follow: build(Policy::none()),
        }
    }

    /// 执行单个请求
    ///
    /// 超时作用于整个请求（含响应体读取）。传输层失败映射为
    /// TransportTimeout / TransportConnection / TransportOther
    pub async fn execute(&self, request: ProbeRequest) -> Result<Response> {
        let inner = if request.follow_redirects {
            &self.follow
        } else {
            &self.no_follow
        };

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
        };

        let req = inner
            .request(method, request.url)
            .headers(request.headers)
            .timeout(request.timeout);

        let start = std::time::Instant::now();
        let response = req.send().await.map_err(RuprobeError::from_transport)?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(RuprobeError::from_transport)?;
        let duration = start.elapsed();

        Response::new(status, headers, final_url, body, duration)
    }
}
