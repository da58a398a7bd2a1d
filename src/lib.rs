//! Storefront desktop shell.
//!
//! At startup the shell resolves its entrypoint: the remote web storefront
//! (shown by the `storefront-web` helper) or the bundled native catalogue.
//! The decision lives in [`resolver::EntrypointResolver`]; everything it
//! talks to is injected so tests can swap in fakes.

pub mod app;
pub mod config;
pub mod models;
pub mod remote;
pub mod resolver;
pub mod storage;
pub mod surface;
