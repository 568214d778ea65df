//! Auth endpoints: register, login, refresh, logout, change-password.

pub mod cookies;
pub mod login;
pub mod password;
pub(crate) mod principal;
pub mod register;
pub mod session;
pub mod state;
pub mod types;

pub use state::{AuthConfig, AuthState, Environment};

#[cfg(test)]
mod tests;
