use std::sync::Arc;

use crate::domain::user::{ProfileFields, User};
use crate::infra::store::Store;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("authentication required")]
    Unauthenticated,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Unknown wallets get an empty profile. Nothing is written.
    pub async fn get_profile(&self, wallet: &str) -> Result<User, UserError> {
        let user = self.store.get_user(wallet).await?;
        Ok(user.unwrap_or_else(|| User::default_for(wallet)))
    }

    /// Replaces the whole profile. Fields missing from `fields` end up empty.
    pub async fn upsert_profile(
        &self,
        wallet: &str,
        fields: ProfileFields,
    ) -> Result<User, UserError> {
        if wallet.is_empty() {
            return Err(UserError::Unauthenticated);
        }

        let user = self
            .store
            .put_user(User::from_fields(wallet, fields))
            .await?;

        tracing::info!(wallet = %user.wallet_address, "profile saved");
        Ok(user)
    }
}
