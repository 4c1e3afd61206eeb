use futures::channel::oneshot;
use kb_shared::{
    const_config::path::{
        PATH_API_USERS_LOGIN, PATH_API_USERS_LOGOUT, PATH_API_USERS_REGISTER,
        PATH_API_USERS_VERIFY_TOKEN,
    },
    req_args::{LoginReqArgs, RegisterReqArgs},
    uac::{LoginResponse, UserIdentity, UserRecord, VerifyTokenResponse},
};
use secrecy::ExposeSecret as _;
use std::sync::Arc;
use tracing::info;

use crate::{
    client::{process_json_body, send_outcome, Interceptors, UiCallBack, NO_ARGS},
    Client,
};

pub mod admin;
pub mod chat;
pub mod knowledge;

impl Client {
    /// On success the identity and the bearer token are stored before the
    /// receiver is completed
    #[tracing::instrument(skip(ui_notify))]
    pub fn login<F>(
        &self,
        args: LoginReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Arc<UserIdentity>>>
    where
        F: UiCallBack,
    {
        let args = serde_json::json!({
            "account": args.account,
            "password": args.password.expose_secret(),
        });
        let (tx, rx) = oneshot::channel();
        let interceptors = Arc::clone(&self.interceptors);
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = process_login(&interceptors, resp).await;
            send_outcome(tx, msg);
            ui_notify();
        };
        self.initiate_request(&PATH_API_USERS_LOGIN, &args, on_done);
        rx
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn register<F: UiCallBack>(
        &self,
        args: RegisterReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<UserRecord>> {
        let mut body = serde_json::json!({
            "account": args.account,
            "password": args.password.expose_secret(),
        });
        if let Some(role) = args.role {
            body["role"] = serde_json::Value::String(role.to_string());
        }
        self.send_request_expect_json(&PATH_API_USERS_REGISTER, &body, ui_notify)
    }

    /// The local session is cleared even if the server call fails. The request
    /// is built first so it still carries the token.
    #[tracing::instrument(skip(ui_notify))]
    pub fn logout<F: UiCallBack>(&self, ui_notify: F) -> oneshot::Receiver<anyhow::Result<()>> {
        let rx = self.send_request_expect_empty(&PATH_API_USERS_LOGOUT, &NO_ARGS, ui_notify);
        self.identity().logout();
        rx
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn verify_token<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<VerifyTokenResponse>> {
        self.send_request_expect_json(&PATH_API_USERS_VERIFY_TOKEN, &NO_ARGS, ui_notify)
    }
}

#[tracing::instrument(skip_all, err(Debug))]
async fn process_login(
    interceptors: &Interceptors,
    response: reqwest::Result<reqwest::Response>,
) -> anyhow::Result<Arc<UserIdentity>> {
    let body: LoginResponse = process_json_body(interceptors, response).await?;
    let (identity, token) = body.into_parts();
    info!(account = ?identity.account(), role = ?identity.role(), "login succeeded");
    interceptors.identity.set_token(&token);
    let identity = Arc::new(identity);
    interceptors.identity.login(identity.as_ref().clone());
    Ok(identity)
}
