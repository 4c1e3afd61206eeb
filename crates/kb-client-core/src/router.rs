//! Client side routing
//!
//! Paths are plain history style paths (`/chat`), not hash fragments. The
//! table is static, the only runtime input is the guard stage which checks
//! the current identity before a view is entered.

use kb_shared::const_config::route::{
    ROUTE_CHAT, ROUTE_HOME, ROUTE_KNOWLEDGE, ROUTE_LOGIN, ROUTE_ROOT, ROUTE_USER_MANAGE,
};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{error, info, warn};

use crate::identity::IdentityStore;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum View {
    Home,
    Chat,
    Knowledge,
    Login,
    UserManage,
}

/// Who may enter a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
    pub access: Access,
}

pub const ROUTES: &[RouteEntry] = &[
    RouteEntry {
        path: ROUTE_HOME,
        name: "Home",
        view: View::Home,
        access: Access::Authenticated,
    },
    RouteEntry {
        path: ROUTE_CHAT,
        name: "Chat",
        view: View::Chat,
        access: Access::Authenticated,
    },
    RouteEntry {
        path: ROUTE_KNOWLEDGE,
        name: "Knowledge",
        view: View::Knowledge,
        access: Access::Authenticated,
    },
    RouteEntry {
        path: ROUTE_LOGIN,
        name: "Login",
        view: View::Login,
        access: Access::Public,
    },
    RouteEntry {
        path: ROUTE_USER_MANAGE,
        name: "UserManage",
        view: View::UserManage,
        access: Access::Admin,
    },
];

/// Unconditional redirects applied before lookup (from, to)
pub const REDIRECTS: &[(&str, &str)] = &[(ROUTE_ROOT, ROUTE_LOGIN)];

impl View {
    pub fn entry(&self) -> &'static RouteEntry {
        ROUTES
            .iter()
            .find(|entry| entry.view == *self)
            .unwrap_or_else(|| unreachable!("every view has a route, checked by tests"))
    }

    pub fn path(&self) -> &'static str {
        self.entry().path
    }
}

/// Drops any query string or fragment and a trailing slash (except for the
/// root). An empty path is the root.
pub fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        ROUTE_ROOT
    } else {
        trimmed
    }
}

/// Static lookup with redirects applied, no guards
pub fn resolve(path: &str) -> Option<&'static RouteEntry> {
    let mut path = normalize(path);
    if let Some((_, to)) = REDIRECTS.iter().find(|(from, _)| *from == path) {
        path = *to;
    }
    ROUTES.iter().find(|entry| entry.path == path)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

pub fn guard(entry: &RouteEntry, identity: &IdentityStore) -> GuardDecision {
    match entry.access {
        Access::Public => GuardDecision::Allow,
        Access::Authenticated if identity.is_logged_in() => GuardDecision::Allow,
        Access::Admin if identity.is_admin() => GuardDecision::Allow,
        Access::Admin if identity.is_logged_in() => GuardDecision::Redirect(ROUTE_HOME),
        Access::Authenticated | Access::Admin => GuardDecision::Redirect(ROUTE_LOGIN),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Entered {
        path: &'static str,
        view: View,
        /// Set when a redirect or guard changed the destination
        requested: Option<String>,
    },
    NotFound {
        path: String,
    },
}

impl Navigation {
    pub fn view(&self) -> Option<View> {
        match self {
            Navigation::Entered { view, .. } => Some(*view),
            Navigation::NotFound { .. } => None,
        }
    }
}

/// Tracks the current route. Clones share the same state.
#[derive(Debug, Clone)]
pub struct Router {
    identity: IdentityStore,
    inner: Arc<Mutex<RouterInner>>,
}

#[derive(Debug)]
struct RouterInner {
    current: &'static str,
    history: Vec<&'static str>,
}

impl Router {
    /// Starts by navigating to the root
    #[tracing::instrument(name = "NEW ROUTER", skip(identity))]
    pub fn new(identity: IdentityStore) -> Self {
        let router = Self {
            identity,
            inner: Arc::new(Mutex::new(RouterInner {
                current: ROUTE_ROOT,
                history: Vec::new(),
            })),
        };
        router.push(ROUTE_ROOT);
        router
    }

    pub fn current_path(&self) -> &'static str {
        self.lock().current
    }

    /// Every path entered so far, oldest first
    pub fn history(&self) -> Vec<&'static str> {
        self.lock().history.clone()
    }

    /// Resolves `path` and runs the guard stage. Unknown paths leave the
    /// current route unchanged.
    #[tracing::instrument(skip(self))]
    pub fn push(&self, path: &str) -> Navigation {
        let requested = normalize(path);
        let Some(mut entry) = resolve(requested) else {
            warn!(requested, "no route matches");
            return Navigation::NotFound {
                path: requested.to_string(),
            };
        };

        let mut hops = 0;
        while let GuardDecision::Redirect(to) = guard(entry, &self.identity) {
            info!(from = entry.path, to, "guard redirected navigation");
            hops += 1;
            match resolve(to) {
                Some(next) if hops <= ROUTES.len() => entry = next,
                _ => {
                    error!(to, hops, "guard redirect could not be resolved, going to login");
                    entry = View::Login.entry();
                    break;
                }
            }
        }

        let mut inner = self.lock();
        inner.current = entry.path;
        inner.history.push(entry.path);
        Navigation::Entered {
            path: entry.path,
            view: entry.view,
            requested: (entry.path != requested).then(|| requested.to_string()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RouterInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
