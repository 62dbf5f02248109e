//! Token minting/verification and the request-scoped principal.

pub mod principal;
pub mod tokens;

pub use principal::Principal;
pub use tokens::{TokenError, TokenService};
