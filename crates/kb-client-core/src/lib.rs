//! Stores the session, routing and HTTP functionality shared by the clients
//! NB: The assumption is made that the async runtime has already been started
//! before any functions from this library are called

#![warn(unused_crate_dependencies)]


mod client;
pub mod identity;
pub mod notify;
pub mod router;
pub mod storage;

pub use client::{
    closure_traits, server_message, CallError, Client, ClientSettings, NoArgs, UiCallBack,
    NO_ARGS,
};
pub use identity::IdentityStore;
pub use notify::{Notification, NotificationLevel, NotificationLog, Notifier};
pub use router::{Navigation, Router, View};
