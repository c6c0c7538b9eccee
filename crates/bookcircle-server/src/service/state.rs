//! Application state and dependency injection.

use bookcircle_postgres::PgClient;

use crate::service::{PasswordHasher, Result, ServiceConfig, TokenSigner};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    pg_client: PgClient,

    password_hasher: PasswordHasher,
    token_signer: TokenSigner,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to the database, applies pending migrations and constructs
    /// the security services.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        let service_state = Self {
            pg_client: config.connect_postgres().await?,

            password_hasher: config.create_password_hasher(),
            token_signer: config.create_token_signer(),
        };

        Ok(service_state)
    }

    /// Creates application state from already-constructed services.
    ///
    /// Intended for compositions that manage their own database client,
    /// such as tests that point at a scratch database.
    pub fn from_parts(
        pg_client: PgClient,
        password_hasher: PasswordHasher,
        token_signer: TokenSigner,
    ) -> Self {
        Self {
            pg_client,
            password_hasher,
            token_signer,
        }
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+ $(,)?) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(pg_client: PgClient);

impl_di!(password_hasher: PasswordHasher);
impl_di!(token_signer: TokenSigner);
