use anyhow::Context as _;
use closure_traits::{ChannelCallBack, ChannelCallBackOutput};
use futures::channel::oneshot;
use kb_shared::const_config::{
    client::{CLIENT_DEFAULT_SERVER_ADDRESS, CLIENT_REQUEST_TIMEOUT},
    path::PathSpec,
};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::{identity::IdentityStore, notify::Notifier, router::Router};
use interceptor::Interceptors;

pub mod api;
mod interceptor;
mod sse;

pub use interceptor::{server_message, CallError};

/// Serializes to `{}` as a body and to nothing as a query string
#[derive(Debug, serde::Serialize)]
pub struct NoArgs {}

pub const NO_ARGS: NoArgs = NoArgs {};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub server_address: String,
    pub timeout: Duration,
    /// When the server answers 401 the token is always dropped. This controls
    /// whether the stored identity is dropped along with it.
    pub unauthorized_clears_identity: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_address: CLIENT_DEFAULT_SERVER_ADDRESS.to_string(),
            timeout: CLIENT_REQUEST_TIMEOUT,
            unauthorized_clears_identity: true,
        }
    }
}

/// HTTP client for the knowledge-base server.
///
/// Every request goes through the outbound interceptor (attaches the stored
/// credential) and every response through the inbound interceptor (turns
/// failures into notifications, session expiry and redirects). The caller
/// always receives the failure as well.
#[derive(Debug, Clone)]
pub struct Client {
    api_client: reqwest::Client,
    server_address: Arc<str>,
    interceptors: Arc<Interceptors>,
}

impl Client {
    #[tracing::instrument(name = "NEW CLIENT-CORE", skip(identity, router, notifier))]
    pub fn new(
        settings: ClientSettings,
        identity: IdentityStore,
        router: Router,
        notifier: Arc<dyn Notifier>,
    ) -> anyhow::Result<Self> {
        let api_client = build_api_client(settings.timeout)?;
        Ok(Self {
            api_client,
            server_address: settings.server_address.trim_end_matches('/').into(),
            interceptors: Arc::new(Interceptors::new(
                identity,
                router,
                notifier,
                settings.unauthorized_clears_identity,
            )),
        })
    }

    pub fn identity(&self) -> &IdentityStore {
        &self.interceptors.identity
    }

    pub fn router(&self) -> &Router {
        &self.interceptors.router
    }

    pub fn server_address(&self) -> &str {
        &self.server_address
    }

    #[tracing::instrument(skip(self, args, on_done))]
    // WARNING: Must skip args as it may contain sensitive info and "safe" versions
    // would usually already be logged by the caller
    fn initiate_request<T, F, O>(&self, path_spec: &PathSpec, args: &T, on_done: F)
    where
        T: serde::Serialize + ?Sized,
        F: ChannelCallBack<O>,
        O: ChannelCallBackOutput,
    {
        let mut request = self
            .api_client
            .request(path_spec.method.clone(), self.path_to_url(&path_spec.path));
        request = if path_spec.is_write() {
            request.json(args)
        } else {
            request.query(args)
        };
        let request = self.interceptors.outbound(request);
        reqwest_cross::fetch(request, on_done)
    }

    fn send_request_expect_json<F, T, U>(
        &self,
        path_spec: &PathSpec,
        args: &T,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<U>>
    where
        T: serde::Serialize + ?Sized,
        F: UiCallBack,
        U: Send + Debug + serde::de::DeserializeOwned + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let interceptors = Arc::clone(&self.interceptors);
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = process_json_body(&interceptors, resp).await;
            send_outcome(tx, msg);
            ui_notify();
        };
        self.initiate_request(path_spec, args, on_done);
        rx
    }

    fn send_request_expect_empty<F, T>(
        &self,
        path_spec: &PathSpec,
        args: &T,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>>
    where
        T: serde::Serialize + ?Sized,
        F: UiCallBack,
    {
        let (tx, rx) = oneshot::channel();
        let interceptors = Arc::clone(&self.interceptors);
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = process_empty(&interceptors, resp).await;
            send_outcome(tx, msg);
            ui_notify();
        };
        self.initiate_request(path_spec, args, on_done);
        rx
    }

    #[tracing::instrument(ret, skip(self))]
    fn path_to_url(&self, path: &str) -> String {
        format!("{}{path}", self.server_address)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_api_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("unable to create reqwest client")
}

#[cfg(target_arch = "wasm32")]
fn build_api_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    // The browser fetch API owns timeouts on the web
    tracing::debug!(?timeout, "request timeout not applied on wasm");
    reqwest::Client::builder()
        .build()
        .context("unable to create reqwest client")
}

fn send_outcome<T>(tx: oneshot::Sender<T>, msg: T) {
    if tx.send(msg).is_err() {
        warn!("receiver dropped before the response was delivered");
    }
}

#[tracing::instrument(skip_all, ret, err(Debug))]
async fn process_empty(
    interceptors: &Interceptors,
    response: reqwest::Result<reqwest::Response>,
) -> anyhow::Result<()> {
    interceptors.inbound(response).await?;
    Ok(())
}

#[tracing::instrument(skip_all, ret, err(Debug))]
async fn process_json_body<T>(
    interceptors: &Interceptors,
    response: reqwest::Result<reqwest::Response>,
) -> anyhow::Result<T>
where
    T: Debug + serde::de::DeserializeOwned,
{
    let response = interceptors.inbound(response).await?;
    let body = response
        .json()
        .await
        .map_err(|e| CallError::Parse(e.to_string()))?;
    Ok(body)
}

#[tracing::instrument(skip_all, err(Debug))]
async fn process_text(
    interceptors: &Interceptors,
    response: reqwest::Result<reqwest::Response>,
) -> anyhow::Result<String> {
    let response = interceptors.inbound(response).await?;
    let body = response
        .text()
        .await
        .map_err(|e| CallError::Parse(e.to_string()))?;
    Ok(body)
}

pub trait UiCallBack: 'static + Send + FnOnce() {}
impl<T> UiCallBack for T where T: 'static + Send + FnOnce() {}

#[cfg(not(target_arch = "wasm32"))]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> + Send {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> + Send {}
}

#[cfg(target_arch = "wasm32")]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> {}
}
