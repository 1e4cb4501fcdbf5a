//! Hosted-backend client for the Budget It app.
//!
//! This crate contains:
//! - The [`store::RowStore`] contract over the backend's row API and its
//!   PostgREST-style implementation ([`rest::RestClient`])
//! - The [`auth::AuthApi`] contract, the GoTrue-style [`auth::AuthClient`],
//!   and the session change stream
//! - The [`session::SessionStore`] tracking identity and profile
//! - Repositories for plans, expenses, organizations, and profiles
//! - In-memory fakes for tests ([`test_utils`])

pub mod auth;
pub mod error;
pub mod repositories;
pub mod rest;
pub mod session;
pub mod store;
pub mod test_utils;

pub use auth::{AuthApi, AuthClient, AuthUser, Session};
pub use error::BackendError;
pub use rest::RestClient;
pub use session::{SessionState, SessionStore};
pub use store::{Filter, RowStore};
