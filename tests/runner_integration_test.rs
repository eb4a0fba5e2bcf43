use std::time::Duration;

use ruprobe::probe::{Classification, ProbeRunner, RequestDescriptor, SessionConfig};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn get(name: &str, url: &str) -> RequestDescriptor {
    RequestDescriptor::get(name, url).unwrap()
}

/// 返回保证连接被拒绝的本地地址
async fn refused_url() -> String {
    // 绑定再立刻释放端口，对它的连接必然失败
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

/// 2xx/3xx 一律分类为 success，与 body 内容无关
#[tokio::test]
async fn test_success_range_classification() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string("anything"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/elsewhere"))
        .mount(&mock_server)
        .await;

    let descriptors = vec![
        get("ok", &format!("{}/ok", mock_server.uri())),
        get("empty", &format!("{}/empty", mock_server.uri())),
        // 不跟随重定向，302 本身就是要观察的结果
        get("moved", &format!("{}/moved", mock_server.uri())).with_follow_redirects(false),
    ];

    let runner = ProbeRunner::new(SessionConfig::new());
    let outcomes = runner.run(&descriptors).await;

    assert_eq!(outcomes.len(), 3);
    for outcome in &outcomes {
        assert_eq!(outcome.classification, Classification::Success);
        assert!(outcome.error.is_none());
    }
    assert_eq!(outcomes[2].status, Some(302));
}

/// 错误状态码的分类边界
#[tokio::test]
async fn test_error_status_classification() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/boom"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let descriptors = vec![
        get("gone", &format!("{}/gone", mock_server.uri())),
        get("boom", &format!("{}/boom", mock_server.uri())),
    ];

    let runner = ProbeRunner::new(SessionConfig::new());
    let outcomes = runner.run(&descriptors).await;

    assert_eq!(outcomes[0].classification, Classification::ClientError);
    assert_eq!(outcomes[1].classification, Classification::ServerError);
    // 抵达了服务器，所以有状态码没有错误详情
    assert_eq!(outcomes[0].status, Some(404));
    assert!(outcomes[0].error.is_none());
}

/// 超时产生 Timeout 分类，没有状态码，错误详情非空
#[tokio::test]
async fn test_timeout_outcome() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&mock_server)
        .await;

    let descriptor = get("slow", &format!("{}/slow", mock_server.uri()))
        .with_timeout(Duration::from_millis(300))
        .unwrap();

    let runner = ProbeRunner::new(SessionConfig::new());
    let outcomes = runner.run(&[descriptor]).await;

    let outcome = &outcomes[0];
    assert_eq!(outcome.classification, Classification::Timeout);
    assert!(outcome.status.is_none());
    assert!(!outcome.error.as_deref().unwrap().is_empty());
}

/// 批次中一个端点连不上，不影响其余探测，顺序保持
#[tokio::test]
async fn test_connection_error_does_not_abort_batch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let dead = refused_url().await;
    let descriptors = vec![
        get("p1", &format!("{}/a", mock_server.uri())),
        get("p2", &dead),
        get("p3", &format!("{}/b", mock_server.uri())),
        get("p4", &format!("{}/c", mock_server.uri())),
        get("p5", &format!("{}/d", mock_server.uri())),
    ];

    let runner = ProbeRunner::new(SessionConfig::new());
    let outcomes = runner.run(&descriptors).await;

    assert_eq!(outcomes.len(), 5);
    let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["p1", "p2", "p3", "p4", "p5"]);

    assert_eq!(outcomes[1].classification, Classification::ConnectionError);
    assert!(outcomes[1].status.is_none());
    for i in [0, 2, 3, 4] {
        assert_eq!(outcomes[i].classification, Classification::Success);
    }
}

/// first-success 语义：命中即停，后面的描述符不再执行
#[tokio::test]
async fn test_run_until_success_stops_early() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/miss"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hit"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/never"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let descriptors = vec![
        get("first", &format!("{}/miss", mock_server.uri())),
        get("second", &format!("{}/hit", mock_server.uri())),
        get("third", &format!("{}/never", mock_server.uri())),
    ];

    let runner = ProbeRunner::new(SessionConfig::new());
    let outcomes = runner.run_until_success(&descriptors).await;

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].classification, Classification::ClientError);
    assert_eq!(outcomes[1].classification, Classification::Success);
}

/// JSON 解码失败不改变 HTTP 层分类
#[tokio::test]
async fn test_decode_failure_keeps_classification() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login page</html>"))
        .mount(&mock_server)
        .await;

    let runner = ProbeRunner::new(SessionConfig::new());
    let outcomes = runner
        .run(&[get("html", &format!("{}/html", mock_server.uri()))])
        .await;

    let outcome = &outcomes[0];
    assert_eq!(outcome.classification, Classification::Success);
    assert!(!outcome.json_parsed);
    assert!(outcome.json.is_none());
    assert!(outcome.error.is_none());
}

/// 跟随重定向后 final_url 是落点而不是请求地址
#[tokio::test]
async fn test_final_url_after_redirect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("{}/new", mock_server.uri()).as_str()),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let runner = ProbeRunner::new(SessionConfig::new());
    let outcomes = runner
        .run(&[get("redirect", &format!("{}/old", mock_server.uri()))])
        .await;

    let outcome = &outcomes[0];
    assert_eq!(outcome.status, Some(200));
    assert!(outcome.final_url.as_deref().unwrap().ends_with("/new"));
}

/// 会话默认头被描述符同名头覆盖，cookie 和 query 实际上了线
#[tokio::test]
async fn test_session_merge_on_the_wire() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(header("X-Probe", "descriptor"))
        .and(header("Cookie", "sid=abc123"))
        .and(query_param("q", "safari"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let session = SessionConfig::new().with_header("X-Probe", "session");
    let descriptor = get("search", &format!("{}/api/search", mock_server.uri()))
        .with_header("X-Probe", "descriptor")
        .with_cookie("sid", "abc123")
        .with_query("q", "safari");

    let runner = ProbeRunner::new(session);
    let outcomes = runner.run(&[descriptor]).await;

    // 匹配失败 wiremock 会返回 404，success 即证明合并正确
    assert_eq!(outcomes[0].classification, Classification::Success);
}

/// 相同输入跑两遍，分类和状态码序列一致（耗时除外）
#[tokio::test]
async fn test_run_is_idempotent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let descriptors = vec![
        get("a", &format!("{}/a", mock_server.uri())),
        get("b", &format!("{}/b", mock_server.uri())),
    ];

    let runner = ProbeRunner::new(SessionConfig::new());
    let first = runner.run(&descriptors).await;
    let second = runner.run(&descriptors).await;

    let shape =
        |outcomes: &[ruprobe::Outcome]| -> Vec<(Classification, Option<u16>)> {
            outcomes
                .iter()
                .map(|o| (o.classification, o.status))
                .collect()
        };
    assert_eq!(shape(&first), shape(&second));
}

/// body 摘录不超过配置上限
#[tokio::test]
async fn test_excerpt_length_bound() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/big"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(10_000)))
        .mount(&mock_server)
        .await;

    let session = SessionConfig::new().with_excerpt_len(50);
    let runner = ProbeRunner::new(session);
    let outcomes = runner
        .run(&[get("big", &format!("{}/big", mock_server.uri()))])
        .await;

    assert_eq!(outcomes[0].body_excerpt.chars().count(), 50);
}
