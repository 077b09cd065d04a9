//! Persistence interfaces and their implementations.
//!
//! Handlers and services talk to these traits; `main.rs` wires the
//! Postgres implementations, tests and local development use the
//! in-memory ones.

pub mod memory;
pub mod session;
pub mod token_denylist;
pub mod user;

pub use session::{PgSessionStore, SessionStore};
pub use token_denylist::{PgTokenDenylist, TokenDenylist};
pub use user::{PgUserStore, UserStore};
