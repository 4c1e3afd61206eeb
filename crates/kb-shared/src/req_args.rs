//! This module stores the expected format of the arguments for the requests
//! The structure of the module is supposed to match the path of the endpoints.
//! For example `/api/chat/get_history/` would map to
//! [`api::chat::HistoryReqArgs`]. Some structs are not serializable but are
//! still included here to know what needs to be sent

use crate::uac::{Account, Role};
use secrecy::{ExposeSecret, SecretString};
use std::fmt::Debug;

pub mod api;

#[derive(serde::Deserialize, Clone)]
pub struct LoginReqArgs {
    pub account: String,
    pub password: SecretString,
}

impl LoginReqArgs {
    pub fn new<S: Into<String>>(account: S, password: SecretString) -> Self {
        Self {
            account: account.into(),
            password,
        }
    }
}

impl Debug for LoginReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginReqArgs")
            .field("account", &self.account)
            .field("has_password", &!self.password.expose_secret().is_empty())
            .finish()
    }
}

#[derive(Clone)]
pub struct RegisterReqArgs {
    pub account: Account,
    pub password: SecretString,
    /// Server default (`user`) applies when not set
    pub role: Option<Role>,
}

impl Debug for RegisterReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterReqArgs")
            .field("account", &self.account)
            .field("has_password", &!self.password.expose_secret().is_empty())
            .field("role", &self.role)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_does_not_leak_password() {
        let args = LoginReqArgs::new("farmer1", "hunter2".to_string().into());
        let actual = format!("{args:?}");
        assert!(!actual.contains("hunter2"), "{actual}");
        assert!(actual.contains("has_password: true"), "{actual}");
    }
}
