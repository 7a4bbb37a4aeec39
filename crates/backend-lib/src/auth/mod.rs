// ============================
// hwcatalog-backend-lib/src/auth/mod.rs
// ============================
//! Authentication and authorization.

pub mod gate;
pub mod password;
pub mod session;
pub mod token;
mod service;
mod service_impl;

pub use gate::{authorize, bearer_token, check_access, Access, Admin, Caller};
pub use password::{validate_password_strength, CredentialHasher, PasswordRequirements, DIGEST_LEN};
pub use session::{IdentityTable, Session};
pub use service::AuthService;
pub use service_impl::DefaultAuth;
pub use token::{derive_token, TokenIssuer};
