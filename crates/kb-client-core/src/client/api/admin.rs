//! Endpoints the server only allows for admins

mod user;
