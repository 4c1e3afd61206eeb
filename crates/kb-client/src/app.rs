use anyhow::{bail, Context as _};
use futures::channel::oneshot;
use kb_client_core::{
    storage::{DurableStorage, FileStorage},
    Client, ClientSettings, IdentityStore, Navigation, Notification, NotificationLog, Router,
    View,
};
use kb_shared::{
    chat::SessionSummary,
    errors::NotLoggedInError,
    req_args::{
        api::{
            chat::{SessionListReqArgs, SessionReqArgs},
            knowledge::{
                DiseaseSubgraphReqArgs, NodeReqArgs, NodeSubgraphReqArgs, RelatedNodesReqArgs,
            },
        },
        LoginReqArgs, RegisterReqArgs,
    },
    uac::{Account, Role, UserRecord},
};
use secrecy::SecretString;
use std::{io::BufRead as _, sync::Arc};
use tracing::{info, instrument};

use crate::{
    cli::{ChatCommand, Command, KnowledgeCommand, UsersCommand},
    configuration::Configuration,
};

/// Everything one run of the client needs, wired together
#[derive(Debug)]
pub struct AppShell {
    client: Client,
    notifications: NotificationLog,
}

impl AppShell {
    #[instrument(name = "START SHELL", skip_all)]
    pub fn new(configuration: &Configuration) -> anyhow::Result<Self> {
        let storage = FileStorage::open(&configuration.storage.path)?;
        Self::with_storage(configuration.client_settings(), Arc::new(storage))
    }

    pub fn with_storage(
        settings: ClientSettings,
        storage: Arc<dyn DurableStorage>,
    ) -> anyhow::Result<Self> {
        let identity = IdentityStore::load(storage);
        let router = Router::new(identity.clone());
        let notifications = NotificationLog::new();
        let client = Client::new(
            settings,
            identity,
            router,
            Arc::new(notifications.clone()),
        )?;
        Ok(Self {
            client,
            notifications,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn drain_notifications(&self) -> Vec<Notification> {
        self.notifications.drain()
    }

    /// Runs one command and returns what should be shown to the user
    // Skipped as the command may hold a password
    #[instrument(skip_all)]
    pub async fn run(&self, command: Command) -> anyhow::Result<String> {
        match command {
            Command::Login { account, password } => {
                let password = password_or_prompt(password)?;
                self.login(account, password).await
            }
            Command::Logout => {
                // The local session is gone even if the server call fails
                if let Err(err) = wait(self.client.logout(|| {})).await {
                    info!(?err, "server side logout failed");
                }
                Ok("Logged out".to_string())
            }
            Command::Whoami { verify } => self.whoami(verify).await,
            Command::Register {
                account,
                role,
                password,
            } => self.register(account, role, password).await,
            Command::Navigate { path } => Ok(describe_navigation(&self.client.router().push(&path))),
            Command::Users(command) => self.users(command).await,
            Command::Chat(command) => self.chat(command).await,
            Command::Knowledge(command) => self.knowledge(command).await,
        }
    }

    async fn login(&self, account: String, password: SecretString) -> anyhow::Result<String> {
        self.enter(View::Login)?;
        let identity = wait(
            self.client
                .login(LoginReqArgs::new(account, password), || {}),
        )
        .await?;
        let navigation = self.client.router().push(View::Home.path());
        Ok(format!(
            "Logged in as {} ({}), {}",
            identity.account().unwrap_or("unknown"),
            identity.role().unwrap_or("no role"),
            describe_navigation(&navigation)
        ))
    }

    async fn whoami(&self, verify: bool) -> anyhow::Result<String> {
        let identity = self.client.identity().user_info().ok_or(NotLoggedInError)?;
        let mut result = serde_json::to_string_pretty(identity.as_ref())
            .context("failed to format identity")?;
        if verify {
            let status = wait(self.client.verify_token(|| {})).await?;
            result.push_str(if status.is_valid() {
                "\nToken is valid"
            } else {
                "\nToken is not valid"
            });
        }
        Ok(result)
    }

    async fn register(
        &self,
        account: String,
        role: Option<Role>,
        password: Option<String>,
    ) -> anyhow::Result<String> {
        let args = RegisterReqArgs {
            account: Account::try_from(account).context("invalid account name")?,
            password: password_or_prompt(password)?,
            role,
        };
        let created = wait(self.client.register(args, || {})).await?;
        Ok(format!("Created {}", format_user(&created)))
    }

    async fn users(&self, command: UsersCommand) -> anyhow::Result<String> {
        self.enter(View::UserManage)?;
        match command {
            UsersCommand::List => {
                let users = wait(self.client.list_users(|| {})).await?;
                Ok(users.iter().map(format_user).collect::<Vec<_>>().join("\n"))
            }
            UsersCommand::Show { id } => {
                let user = wait(self.client.get_user(id.into(), || {})).await?;
                Ok(format_user(&user))
            }
            UsersCommand::Disable { id } => {
                Ok(wait(self.client.disable_account(id.into(), || {})).await?.message)
            }
            UsersCommand::Enable { id } => {
                Ok(wait(self.client.enable_account(id.into(), || {})).await?.message)
            }
            UsersCommand::Delete { id } => {
                wait(self.client.delete_user(id.into(), || {})).await?;
                Ok(format!("Deleted user {id}"))
            }
        }
    }

    async fn chat(&self, command: ChatCommand) -> anyhow::Result<String> {
        self.enter(View::Chat)?;
        match command {
            ChatCommand::New => {
                let created = wait(self.client.create_session(|| {})).await?;
                Ok(created.session_id)
            }
            ChatCommand::Sessions { page, size } => {
                let args = SessionListReqArgs { page, size };
                let list = wait(self.client.get_session_list(&args, || {})).await?;
                Ok(list
                    .sessions
                    .iter()
                    .map(format_session)
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            ChatCommand::History { session_id } => {
                let args = SessionReqArgs { session_id };
                let history = wait(self.client.get_history(&args, || {})).await?;
                Ok(history
                    .messages
                    .iter()
                    .map(|message| format!("[{}] {}", message.role, message.content))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            ChatCommand::Ask {
                session_id,
                message,
            } => wait(self.client.stream_chat(message, session_id, || {})).await,
            ChatCommand::Symptoms { session_id } => {
                let args = SessionReqArgs { session_id };
                let symptoms = wait(self.client.get_symptoms(&args, || {})).await?;
                serde_json::to_string_pretty(&symptoms.symptoms).context("failed to format symptoms")
            }
            ChatCommand::Clear { session_id } => {
                let args = SessionReqArgs { session_id };
                let outcome = wait(self.client.clear_history(&args, || {})).await?;
                Ok(outcome.message.unwrap_or(outcome.status))
            }
        }
    }

    async fn knowledge(&self, command: KnowledgeCommand) -> anyhow::Result<String> {
        self.enter(View::Knowledge)?;
        let data = match command {
            KnowledgeCommand::Graph => wait(self.client.graph(|| {})).await?,
            KnowledgeCommand::Node { id } => {
                wait(self.client.node_details(&NodeReqArgs { id }, || {})).await?
            }
            KnowledgeCommand::Related { id, relation_type } => {
                let args = RelatedNodesReqArgs { id, relation_type };
                wait(self.client.related_nodes(&args, || {})).await?
            }
            KnowledgeCommand::Disease { name } => {
                let args = DiseaseSubgraphReqArgs { disease: name };
                wait(self.client.disease_subgraph(&args, || {})).await?
            }
            KnowledgeCommand::Subgraph { node, node_type } => {
                let args = NodeSubgraphReqArgs { node, node_type };
                wait(self.client.node_subgraph(&args, || {})).await?
            }
        };
        serde_json::to_string_pretty(&data).context("failed to format graph data")
    }

    /// Navigates to `view` and fails if the guard sent us somewhere else
    fn enter(&self, view: View) -> anyhow::Result<()> {
        match self.client.router().push(view.path()) {
            Navigation::Entered { view: entered, .. } if entered == view => Ok(()),
            Navigation::Entered { path, .. } => {
                info!(?view, redirected_to = path, "view not available");
                bail!("{view} is not available to you, redirected to {path}")
            }
            Navigation::NotFound { path } => bail!("no route matches {path}"),
        }
    }
}

async fn wait<T>(rx: oneshot::Receiver<anyhow::Result<T>>) -> anyhow::Result<T> {
    rx.await
        .context("request finished without sending a result")?
}

fn password_or_prompt(password: Option<String>) -> anyhow::Result<SecretString> {
    if let Some(password) = password {
        return Ok(SecretString::from(password));
    }
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("password is required");
    }
    Ok(SecretString::from(password))
}

fn describe_navigation(navigation: &Navigation) -> String {
    match navigation {
        Navigation::Entered {
            path,
            view,
            requested: None,
        } => format!("now on {path} ({view})"),
        Navigation::Entered {
            path,
            view,
            requested: Some(requested),
        } => format!("{requested} redirected to {path} ({view})"),
        Navigation::NotFound { path } => format!("no route matches {path}"),
    }
}

fn format_user(user: &UserRecord) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        user.id,
        user.account,
        user.role,
        if user.is_active { "active" } else { "disabled" }
    )
}

fn format_session(session: &SessionSummary) -> String {
    let updated = session
        .updated_at_utc()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    format!(
        "{}\t{}\t{} messages\t{updated}",
        session.id, session.title, session.message_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_client_core::storage::MemoryStorage;
    use kb_shared::{
        const_config::{route::ROUTE_LOGIN, storage::STORAGE_KEY_USER_INFO},
        uac::UserIdentity,
    };

    fn shell_with(storage: Arc<MemoryStorage>) -> AppShell {
        let settings = ClientSettings {
            server_address: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        AppShell::with_storage(settings, storage).unwrap()
    }

    #[tokio::test]
    async fn whoami_needs_login() {
        let shell = shell_with(Arc::new(MemoryStorage::new()));

        let actual = shell.run(Command::Whoami { verify: false }).await;

        let err = actual.unwrap_err();
        assert!(err.downcast_ref::<NotLoggedInError>().is_some(), "{err:?}");
    }

    #[tokio::test]
    async fn whoami_shows_persisted_identity() {
        let storage = Arc::new(MemoryStorage::with_items([(
            STORAGE_KEY_USER_INFO,
            r#"{"id":3,"account":"farmer1","role":"user"}"#,
        )]));
        let shell = shell_with(storage);

        let actual = shell.run(Command::Whoami { verify: false }).await.unwrap();

        assert!(actual.contains("farmer1"), "{actual}");
    }

    #[tokio::test]
    async fn chat_refused_when_logged_out() {
        let shell = shell_with(Arc::new(MemoryStorage::new()));

        let actual = shell.run(Command::Chat(ChatCommand::New)).await;

        assert!(actual.is_err());
        assert_eq!(shell.client().router().current_path(), ROUTE_LOGIN);
    }

    #[tokio::test]
    async fn user_management_refused_for_non_admin() {
        let shell = shell_with(Arc::new(MemoryStorage::new()));
        shell
            .client()
            .identity()
            .login(UserIdentity::with_role("user"));

        let actual = shell.run(Command::Users(UsersCommand::List)).await;

        let err = actual.unwrap_err();
        assert!(err.to_string().contains("/home"), "{err}");
    }

    #[test]
    fn navigation_descriptions() {
        assert_eq!(
            describe_navigation(&Navigation::NotFound {
                path: "/x".to_string()
            }),
            "no route matches /x"
        );
    }
}
