// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.

use crate::{constants::*, Context, Credential, ProvideCredential, Result};
use async_trait::async_trait;

/// EnvCredentialProvider loads volcengine credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `VOLCENGINE_ACCESS_KEY`: The access key ID, `VOLC_ACCESSKEY` as fallback
/// - `VOLCENGINE_SECRET_KEY`: The secret access key, `VOLC_SECRETKEY` as fallback
/// - `VOLCENGINE_SESSION_TOKEN`: The session token (optional)
///
/// Environment access goes through the [`Context`], so the provider itself
/// never touches process state directly.
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let access_key_id = ctx
            .env_var(VOLCENGINE_ACCESS_KEY)
            .or_else(|| ctx.env_var(VOLC_ACCESSKEY));
        let secret_access_key = ctx
            .env_var(VOLCENGINE_SECRET_KEY)
            .or_else(|| ctx.env_var(VOLC_SECRETKEY));

        match (access_key_id, secret_access_key) {
            (Some(ak), Some(sk)) => Ok(Some(Credential {
                access_key_id: ak,
                secret_access_key: sk,
                session_token: ctx.env_var(VOLCENGINE_SESSION_TOKEN),
                expires_in: None,
            })),
            _ => Ok(None),
        }
    }
}
