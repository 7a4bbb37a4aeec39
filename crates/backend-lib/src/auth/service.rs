use async_trait::async_trait;
use hwcatalog_common::{LoginRequest, RegisterRequest};

use crate::error::AppError;
use crate::storage::Account;

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account; `Conflict` if the username is taken.
    async fn register(&self, request: RegisterRequest) -> Result<Account, AppError>;
    /// Verify credentials and return the bearer token.
    async fn login(&self, request: LoginRequest) -> Result<String, AppError>;
    /// Account a token was issued to in this process lifetime.
    fn resolve(&self, token: &str) -> Option<Account>;
}
