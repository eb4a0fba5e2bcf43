use serde_json::Value;

/// 会话有效性判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Authenticated,
    Expired,
    Unauthenticated,
    /// 响应里没有可辨认的标记字段，无法下结论
    Indeterminate,
}

/// 默认的账号状态标记字段
pub const DEFAULT_MARKER_FIELD: &str = "user_type";
/// 标记字段的过期哨兵值
pub const EXPIRED_SENTINEL: &str = "Expired";

/// 检查已获取的响应体对应的会话状态
///
/// 纯检查逻辑，不含任何网络操作。判定顺序：
/// 1. 标记字段等于过期哨兵 → Expired（哨兵永远权威）
/// 2. 没有状态码 → Indeterminate
/// 3. 状态码在成功区间：有标记字段 → Authenticated，没有 → Indeterminate
/// 4. 其余 → Unauthenticated
pub fn check_session(body: &str, status: Option<u16>) -> SessionState {
    check_session_with_marker(body, status, DEFAULT_MARKER_FIELD, EXPIRED_SENTINEL)
}

pub fn check_session_with_marker(
    body: &str,
    status: Option<u16>,
    marker_field: &str,
    expired_sentinel: &str,
) -> SessionState {
    let marker = marker_value(body, marker_field);

    if marker.as_deref() == Some(expired_sentinel) {
        return SessionState::Expired;
    }

    let Some(code) = status else {
        return SessionState::Indeterminate;
    };

    if (200..=399).contains(&code) {
        if marker.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Indeterminate
        }
    } else {
        SessionState::Unauthenticated
    }
}

/// 从 JSON body 里取出标记字段的字符串值
///
/// body 不是 JSON 对象或字段缺失/非字符串都返回 None
fn marker_value(body: &str, field: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get(field)?.as_str().map(|s| s.to_string())
}

/// 粗糙的登录页判定
///
/// 大小写不敏感的子串匹配（"login" / "sign in"）。这是对目标平台
/// 行为的经验性启发，不是可靠的契约——平台返回登录页时 body 里
/// 通常带有这两个词之一
pub fn looks_like_login_page(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("login") || lower.contains("sign in")
}
