use futures::channel::oneshot;
use kb_shared::{
    chat::{
        CreateSessionResponse, HistoryResponse, SessionListResponse, StatusResponse,
        SymptomsResponse,
    },
    const_config::path::{
        PATH_API_CHAT_ADD_MESSAGE, PATH_API_CHAT_CLEAR_HISTORY, PATH_API_CHAT_CREATE_SESSION,
        PATH_API_CHAT_HISTORY, PATH_API_CHAT_SAVE_SYMPTOMS, PATH_API_CHAT_SESSION_LIST,
        PATH_API_CHAT_STREAM, PATH_API_CHAT_SYMPTOMS,
    },
    req_args::api::chat::{
        AddMessageReqArgs, SaveSymptomsReqArgs, SessionListReqArgs, SessionReqArgs,
        StreamChatReqArgs,
    },
};
use secrecy::ExposeSecret as _;
use std::sync::Arc;

use crate::{
    client::{process_text, send_outcome, sse::assemble_reply, UiCallBack, NO_ARGS},
    Client,
};

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn create_session<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<CreateSessionResponse>> {
        self.send_request_expect_json(&PATH_API_CHAT_CREATE_SESSION, &NO_ARGS, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn get_session_list<F: UiCallBack>(
        &self,
        args: &SessionListReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<SessionListResponse>> {
        self.send_request_expect_json(&PATH_API_CHAT_SESSION_LIST, args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn get_history<F: UiCallBack>(
        &self,
        args: &SessionReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<HistoryResponse>> {
        self.send_request_expect_json(&PATH_API_CHAT_HISTORY, args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn add_message<F: UiCallBack>(
        &self,
        args: &AddMessageReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<StatusResponse>> {
        self.send_request_expect_json(&PATH_API_CHAT_ADD_MESSAGE, args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn clear_history<F: UiCallBack>(
        &self,
        args: &SessionReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<StatusResponse>> {
        self.send_request_expect_json(&PATH_API_CHAT_CLEAR_HISTORY, args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn save_symptoms<F: UiCallBack>(
        &self,
        args: &SaveSymptomsReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<StatusResponse>> {
        self.send_request_expect_json(&PATH_API_CHAT_SAVE_SYMPTOMS, args, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn get_symptoms<F: UiCallBack>(
        &self,
        args: &SessionReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<SymptomsResponse>> {
        self.send_request_expect_json(&PATH_API_CHAT_SYMPTOMS, args, ui_notify)
    }

    /// Sends `message` to the assistant and resolves to the complete reply
    /// once the server has finished streaming it
    #[tracing::instrument(skip(ui_notify))]
    pub fn stream_chat<F: UiCallBack>(
        &self,
        message: String,
        session_id: String,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<String>> {
        let args = StreamChatReqArgs {
            message,
            session_id,
            token: self
                .identity()
                .token()
                .map(|token| token.expose_secret().to_string()),
        };
        let (tx, rx) = oneshot::channel();
        let interceptors = Arc::clone(&self.interceptors);
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = match process_text(&interceptors, resp).await {
                Ok(body) => assemble_reply(&body).map_err(anyhow::Error::from),
                Err(err) => Err(err),
            };
            send_outcome(tx, msg);
            ui_notify();
        };
        self.initiate_request(&PATH_API_CHAT_STREAM, &args, on_done);
        rx
    }
}
