#![warn(unused_crate_dependencies)]

mod suppress_bin_warnings {
    // Only used in binary and triggers unused warning
    use tokio as _;
}

#[cfg(test)] // Only used by the integration tests
mod warning_suppress {
    use wiremock as _;
}

mod app;
pub mod cli;
pub mod configuration;
pub mod tracing;

pub use app::AppShell;
