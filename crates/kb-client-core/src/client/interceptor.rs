use kb_shared::const_config::route::ROUTE_LOGIN;
use reqwest::StatusCode;
use secrecy::ExposeSecret as _;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    identity::IdentityStore,
    notify::{
        Notification, Notifier, NOTIFY_NO_PERMISSION, NOTIFY_REQUEST_FAILED,
        NOTIFY_SESSION_EXPIRED,
    },
    router::Router,
};

/// Root cause of a failed call, available by downcasting the `anyhow::Error`
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CallError {
    #[error("server responded with {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("no response from server: {0}")]
    NoResponse(String),
    #[error("failed to build request: {0}")]
    Build(String),
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("stream reported an error: {0}")]
    Stream(String),
}

impl CallError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            CallError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The outbound and inbound stages wrapped around every request
#[derive(Debug)]
pub(crate) struct Interceptors {
    pub(crate) identity: IdentityStore,
    pub(crate) router: Router,
    notifier: Arc<dyn Notifier>,
    unauthorized_clears_identity: bool,
}

impl Interceptors {
    pub(crate) fn new(
        identity: IdentityStore,
        router: Router,
        notifier: Arc<dyn Notifier>,
        unauthorized_clears_identity: bool,
    ) -> Self {
        Self {
            identity,
            router,
            notifier,
            unauthorized_clears_identity,
        }
    }

    /// Attaches the stored credential if there is one
    pub(crate) fn outbound(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.identity.token() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Passes successful responses through unchanged and classifies failures.
    /// Every failure is returned even when it was also handled here.
    pub(crate) async fn inbound(
        &self,
        response: reqwest::Result<reqwest::Response>,
    ) -> Result<reqwest::Response, CallError> {
        let response = match response {
            Ok(response) => response,
            Err(err) if err.is_builder() => {
                error!(?err, "request could not be built");
                return Err(CallError::Build(err.to_string()));
            }
            Err(err) => {
                // Left to the caller to tell the user
                warn!(?err, is_timeout = err.is_timeout(), "no response received");
                return Err(CallError::NoResponse(err.to_string()));
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_else(|err| {
            warn!(?err, "failed to read body of failed response");
            String::new()
        });
        let message = server_message(&body);
        self.on_failure_status(status, message.as_deref());
        Err(CallError::Status {
            status,
            message: message.unwrap_or_else(|| NOTIFY_REQUEST_FAILED.to_string()),
        })
    }

    /// For statuses other than 401 and 403 the server's message is shown.
    /// It comes from `message`, or `error` as the backend uses that on most
    /// failures (see [`server_message`]).
    #[tracing::instrument(skip(self))]
    pub(crate) fn on_failure_status(&self, status: StatusCode, server_message: Option<&str>) {
        match status {
            StatusCode::UNAUTHORIZED => {
                self.notifier
                    .notify(Notification::error(NOTIFY_SESSION_EXPIRED));
                self.identity
                    .expire_session(self.unauthorized_clears_identity);
                if self.router.current_path() != ROUTE_LOGIN {
                    info!("redirecting to login after session expiry");
                    self.router.push(ROUTE_LOGIN);
                }
            }
            StatusCode::FORBIDDEN => {
                self.notifier.notify(Notification::error(NOTIFY_NO_PERMISSION));
            }
            _ => {
                self.notifier.notify(Notification::error(
                    server_message.unwrap_or(NOTIFY_REQUEST_FAILED),
                ));
            }
        }
    }
}

/// Extracts the human readable message from an error body. The `message` field
/// is preferred over `error`, empty values are ignored.
pub fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"].into_iter().find_map(|field| {
        value
            .get(field)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(String::from)
    })
}
