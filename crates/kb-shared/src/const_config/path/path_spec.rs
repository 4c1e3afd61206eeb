use reqwest::Method;
use std::{borrow::Cow, fmt::Display};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    pub path: Cow<'static, str>,
    pub method: Method,
}

impl PathSpec {
    pub const fn get(path: &'static str) -> Self {
        Self {
            path: Cow::Borrowed(path),
            method: Method::GET,
        }
    }

    pub const fn post(path: &'static str) -> Self {
        Self {
            path: Cow::Borrowed(path),
            method: Method::POST,
        }
    }

    /// Builds a path for a single resource below `prefix`, optionally followed
    /// by an action segment. Django style trailing slashes are kept.
    ///
    /// `prefix` must end with a `/`
    pub fn detail<I: Display>(method: Method, prefix: &str, id: I, action: Option<&str>) -> Self {
        debug_assert!(prefix.ends_with('/'), "prefix must end with a slash");
        let path = match action {
            Some(action) => format!("{prefix}{id}/{action}/"),
            None => format!("{prefix}{id}/"),
        };
        Self {
            path: Cow::Owned(path),
            method,
        }
    }

    /// True for any method that may carry a JSON body
    pub fn is_write(&self) -> bool {
        self.method != Method::GET && self.method != Method::HEAD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_with_action() {
        let actual = PathSpec::detail(Method::POST, "/api/users/", 7, Some("disable_account"));
        assert_eq!(actual.path, "/api/users/7/disable_account/");
        assert_eq!(actual.method, Method::POST);
    }

    #[test]
    fn detail_without_action() {
        let actual = PathSpec::detail(Method::DELETE, "/api/users/", 12, None);
        assert_eq!(actual.path, "/api/users/12/");
        assert!(actual.is_write());
    }

    #[test]
    fn get_is_not_write() {
        assert!(!PathSpec::get("/api/knowledge/graph/").is_write());
        assert!(PathSpec::post("/api/users/login/").is_write());
    }
}
