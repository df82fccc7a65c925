use crate::{
    Config, ConfigCredentialProvider, Context, Credential, EnvCredentialProvider,
    ProvideCredential, ProvideCredentialChain, Result,
};
use async_trait::async_trait;
use std::sync::Arc;

/// DefaultCredentialProvider is the recommended provider for most users.
///
/// It resolves credentials in order:
///
/// 1. Explicit [`Config`] values, when constructed with [`Self::from_config`]
/// 2. Environment variables (via the context's env abstraction)
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain,
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultCredentialProvider {
    /// Create a new DefaultCredentialProvider resolving from the environment.
    pub fn new() -> Self {
        Self {
            chain: ProvideCredentialChain::new().push(EnvCredentialProvider::new()),
        }
    }

    /// Create a DefaultCredentialProvider that consults the given config
    /// before falling back to the environment.
    pub fn from_config(cfg: Arc<Config>) -> Self {
        Self {
            chain: ProvideCredentialChain::new()
                .push(ConfigCredentialProvider::new(cfg))
                .push(EnvCredentialProvider::new()),
        }
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}
