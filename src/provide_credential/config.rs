use crate::{Config, Context, Credential, ProvideCredential, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// ConfigCredentialProvider loads credentials from an explicit [`Config`].
#[derive(Debug)]
pub struct ConfigCredentialProvider {
    config: Arc<Config>,
}

impl ConfigCredentialProvider {
    /// Create a new `ConfigCredentialProvider` instance.
    pub fn new(cfg: Arc<Config>) -> Self {
        Self { config: cfg }
    }
}

#[async_trait]
impl ProvideCredential for ConfigCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        let (Some(ak), Some(sk)) = (&self.config.access_key_id, &self.config.secret_access_key)
        else {
            return Ok(None);
        };

        Ok(Some(Credential {
            access_key_id: ak.clone(),
            secret_access_key: sk.clone(),
            session_token: self.config.session_token.clone(),
            expires_in: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_config_credential_provider() -> anyhow::Result<()> {
        let ctx = Context::new();

        let provider = ConfigCredentialProvider::new(Arc::new(Config {
            access_key_id: Some("cfg_ak".to_string()),
            secret_access_key: Some("cfg_sk".to_string()),
            ..Default::default()
        }));
        let cred = provider.provide_credential(&ctx).await?.unwrap();
        assert_eq!(cred.access_key_id, "cfg_ak");
        assert_eq!(cred.secret_access_key, "cfg_sk");

        let empty = ConfigCredentialProvider::new(Arc::new(Config::default()));
        assert!(empty.provide_credential(&ctx).await?.is_none());

        Ok(())
    }
}
