use crate::constants::DEFAULT_REGION;

/// Config carries the explicit configuration for signing.
///
/// The signing core never reads ambient process state; environment lookup is
/// the job of `EnvCredentialProvider` in the bootstrap layer. Populate this
/// struct from wherever your application keeps its settings.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Access key id for the volcengine account.
    pub access_key_id: Option<String>,
    /// Secret access key for the volcengine account.
    pub secret_access_key: Option<String>,
    /// Session token for transient credentials.
    pub session_token: Option<String>,
    /// Region of the credential scope.
    ///
    /// Defaults to `cn-beijing` when unset.
    pub region: Option<String>,
}

impl Config {
    /// Region to sign against, falling back to the default.
    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_default() {
        assert_eq!(Config::default().region(), "cn-beijing");

        let cfg = Config {
            region: Some("ap-southeast-1".to_string()),
            ..Default::default()
        };
        assert_eq!(cfg.region(), "ap-southeast-1");
    }
}
