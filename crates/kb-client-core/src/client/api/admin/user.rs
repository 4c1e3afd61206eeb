use futures::channel::oneshot;
use kb_shared::{
    const_config::path::{
        path_api_user, path_api_user_delete, path_api_user_disable, path_api_user_enable,
        PATH_API_USERS_LIST,
    },
    id::UserId,
    uac::{MessageResponse, UserRecord},
};

use crate::{
    client::{UiCallBack, NO_ARGS},
    Client,
};

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn list_users<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<Vec<UserRecord>>> {
        self.send_request_expect_json(&PATH_API_USERS_LIST, &NO_ARGS, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn get_user<F: UiCallBack>(
        &self,
        id: UserId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<UserRecord>> {
        self.send_request_expect_json(&path_api_user(id), &NO_ARGS, ui_notify)
    }

    /// The server refuses to disable admin accounts
    #[tracing::instrument(skip(ui_notify))]
    pub fn disable_account<F: UiCallBack>(
        &self,
        id: UserId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<MessageResponse>> {
        self.send_request_expect_json(&path_api_user_disable(id), &NO_ARGS, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn enable_account<F: UiCallBack>(
        &self,
        id: UserId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<MessageResponse>> {
        self.send_request_expect_json(&path_api_user_enable(id), &NO_ARGS, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn delete_user<F: UiCallBack>(
        &self,
        id: UserId,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<()>> {
        self.send_request_expect_empty(&path_api_user_delete(id), &NO_ARGS, ui_notify)
    }
}
