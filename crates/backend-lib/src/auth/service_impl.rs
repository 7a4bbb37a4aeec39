use std::sync::Arc;

use async_trait::async_trait;
use hwcatalog_common::{LoginRequest, RegisterRequest};
use metrics::counter;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::auth::password::{validate_password_strength, PasswordRequirements};
use crate::auth::{AuthService, TokenIssuer};
use crate::error::{report_storage_error, AppError};
use crate::events::{EventPublisher, ACCOUNTS};
use crate::storage::{Account, AccountStore, NewAccount};
use crate::telemetry::{AUTH_LOGIN_FAILURE, AUTH_LOGIN_SUCCESS, AUTH_REGISTER};
use crate::validation;

pub struct DefaultAuth {
    accounts: Arc<dyn AccountStore>,
    issuer: TokenIssuer,
    requirements: PasswordRequirements,
    events: Arc<dyn EventPublisher>,
}

impl DefaultAuth {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        issuer: TokenIssuer,
        requirements: PasswordRequirements,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            accounts,
            issuer,
            requirements,
            events,
        }
    }

    async fn find(&self, username: &str) -> Result<Option<Account>, AppError> {
        self.accounts
            .find_account_by_username(username)
            .await
            .map_err(|err| report_storage_error(err, "find_account_by_username", self.events.as_ref()))
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn register(&self, request: RegisterRequest) -> Result<Account, AppError> {
        let RegisterRequest {
            username,
            password,
            email,
            is_admin,
        } = request;
        let password = Zeroizing::new(password);

        validation::validate_username(&username)?;
        validation::validate_email(&email)?;
        if !validate_password_strength(&password, &self.requirements) {
            return Err(AppError::InvalidInput(
                "password does not meet the configured requirements".to_string(),
            ));
        }

        if self.find(&username).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "username {username} is already registered"
            )));
        }

        let hasher = *self.issuer.hasher();
        let salt = username.clone();
        let password_digest =
            tokio::task::spawn_blocking(move || hasher.digest(&password, &salt)).await?;

        let account = self
            .accounts
            .insert_account(NewAccount {
                username,
                password_digest,
                email,
                is_admin,
            })
            .await
            .map_err(|err| report_storage_error(err, "insert_account", self.events.as_ref()))?;

        counter!(AUTH_REGISTER).increment(1);
        info!(account_id = account.id, username = %account.username, is_admin, "account registered");
        self.events.publish(
            ACCOUNTS,
            format!(
                "account {} registered (id {}, admin: {})",
                account.username, account.id, account.is_admin
            ),
        );
        Ok(account)
    }

    async fn login(&self, request: LoginRequest) -> Result<String, AppError> {
        let LoginRequest { username, password } = request;
        let password = Zeroizing::new(password);

        // Unknown user and wrong password must be indistinguishable to the caller.
        let Some(account) = self.find(&username).await? else {
            counter!(AUTH_LOGIN_FAILURE).increment(1);
            warn!(%username, "login failed");
            return Err(AppError::invalid_credentials());
        };

        let issuer = self.issuer.clone();
        let token = tokio::task::spawn_blocking(move || {
            issuer
                .hasher()
                .verify(&password, &account.username, &account.password_digest)
                .then(|| issuer.issue(&account))
        })
        .await?;

        match token {
            Some(token) => {
                counter!(AUTH_LOGIN_SUCCESS).increment(1);
                info!(%username, "login succeeded");
                Ok(token)
            },
            None => {
                counter!(AUTH_LOGIN_FAILURE).increment(1);
                warn!(%username, "login failed");
                Err(AppError::invalid_credentials())
            },
        }
    }

    fn resolve(&self, token: &str) -> Option<Account> {
        self.issuer.resolve(token)
    }
}
