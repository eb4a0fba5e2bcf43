use std::fs;
use std::time::Duration;

use ruprobe::http::Method;
use ruprobe::plan::PlanLoader;
use tempfile::TempDir;

/// 从实际文件加载完整计划，cookie 文件一并生效
#[test]
fn test_load_plan_with_cookie_file() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(
        temp_dir.path().join("cookies.json"),
        r#"{"sessionid": "abc", "csrftoken": "xyz"}"#,
    )
    .unwrap();

    let plan_path = temp_dir.path().join("ruprobe.toml");
    fs::write(
        &plan_path,
        r#"
[session]
user_agent = "diagnostic/1.0"
timeout_secs = 15
cookie_file = "cookies.json"

[session.headers]
Accept = "application/json"

[[probes]]
name = "profile"
url = "https://example.com/profile"

[[probes]]
name = "search"
url = "https://example.com/api/search"
method = "POST"
follow_redirects = false

[probes.params]
query = "python"
"#,
    )
    .unwrap();

    let plan = PlanLoader::load_from_path(&plan_path).unwrap();
    let session = plan.build_session(temp_dir.path()).unwrap();

    assert_eq!(session.user_agent, "diagnostic/1.0");
    assert_eq!(session.timeout, Duration::from_secs(15));
    assert_eq!(session.cookies.get("sessionid"), Some(&"abc".to_string()));
    assert_eq!(
        session.headers.get("Accept"),
        Some(&"application/json".to_string())
    );

    let descriptors = plan.descriptors().unwrap();
    assert_eq!(descriptors.len(), 2);
    assert_eq!(descriptors[0].name, "profile");
    assert_eq!(descriptors[1].method, Method::Post);
    assert_eq!(descriptors[1].follow_redirects, Some(false));
    assert_eq!(
        descriptors[1].query_params.get("query"),
        Some(&"python".to_string())
    );
}

/// cookie 文件缺失时照常构建会话，以未认证状态继续
#[test]
fn test_missing_cookie_file_proceeds_unauthenticated() {
    let temp_dir = TempDir::new().unwrap();
    let plan_path = temp_dir.path().join("ruprobe.toml");
    fs::write(
        &plan_path,
        r#"
[session]
cookie_file = "does-not-exist.json"

[[probes]]
name = "home"
url = "https://example.com/"
"#,
    )
    .unwrap();

    let plan = PlanLoader::load_from_path(&plan_path).unwrap();
    let session = plan.build_session(temp_dir.path()).unwrap();
    assert!(session.cookies.is_empty());
}

/// 计划里的坏描述符在转换阶段就失败，不会进入执行
#[test]
fn test_plan_with_invalid_probe_fails_fast() {
    let temp_dir = TempDir::new().unwrap();
    let plan_path = temp_dir.path().join("ruprobe.toml");
    fs::write(
        &plan_path,
        r#"
[[probes]]
name = ""
url = "https://example.com/"
"#,
    )
    .unwrap();

    let plan = PlanLoader::load_from_path(&plan_path).unwrap();
    assert!(plan.descriptors().is_err());
}
