use reqwest::StatusCode;
use thiserror::Error;

/// 文献检索失败的分类
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    /// HTTP 429，正常使用中也会出现，等待后减少数量重试即可
    #[error("rate limit reached on the search service")]
    RateLimited,
    /// 详情查询的标识不存在
    #[error("publication not found: {0}")]
    NotFound(String),
    /// 网络错误或服务端错误
    #[error("search service transport error: {0}")]
    Transport(String),
    /// 响应体无法解析
    #[error("could not decode search service response: {0}")]
    Decode(String),
}

impl SearchError {
    /// 根据非成功的HTTP状态码分类
    pub fn from_status(status: StatusCode, resource: &str) -> Self {
        match status {
            StatusCode::TOO_MANY_REQUESTS => SearchError::RateLimited,
            StatusCode::NOT_FOUND => SearchError::NotFound(resource.to_string()),
            _ => SearchError::Transport(format!("HTTP {}", status.as_u16())),
        }
    }

    /// 预期内、有明确处理办法的失败
    pub fn is_actionable(&self) -> bool {
        matches!(self, SearchError::RateLimited)
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return SearchError::from_status(status, "");
        }
        if err.is_decode() {
            return SearchError::Decode(err.without_url().to_string());
        }
        // 错误文本中不带URL，避免泄露检索参数之外的信息
        SearchError::Transport(err.without_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classification() {
        assert_eq!(
            SearchError::from_status(StatusCode::TOO_MANY_REQUESTS, "q"),
            SearchError::RateLimited
        );
        assert_eq!(
            SearchError::from_status(StatusCode::NOT_FOUND, "abc"),
            SearchError::NotFound("abc".to_string())
        );
        assert!(matches!(
            SearchError::from_status(StatusCode::BAD_GATEWAY, "q"),
            SearchError::Transport(_)
        ));
        assert!(matches!(
            SearchError::from_status(StatusCode::FORBIDDEN, "q"),
            SearchError::Transport(_)
        ));
    }

    #[test]
    fn test_only_rate_limit_is_actionable() {
        assert!(SearchError::RateLimited.is_actionable());
        assert!(!SearchError::Transport("HTTP 500".into()).is_actionable());
        assert!(!SearchError::NotFound("x".into()).is_actionable());
    }
}
