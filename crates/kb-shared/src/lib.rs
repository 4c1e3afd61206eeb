//! Code shared between the client library and the application shell

#![warn(unused_crate_dependencies)]

#[cfg(test)] // Included to prevent unused crate warning
mod warning_suppress {
    use rstest as _;
}

pub mod chat;
pub mod const_config;
pub mod errors;
pub mod id;
pub mod knowledge;
mod macros;
pub mod req_args;
pub mod uac;

#[cfg(not(target_arch = "wasm32"))]
pub mod telemetry;
