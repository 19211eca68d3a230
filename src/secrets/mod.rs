//! Lacework API credentials held in a key-value parameter store.

use std::fmt;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;

/// Read access to a key-value parameter store such as SSM Parameter Store.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Fetches the value stored under `name`. Missing parameters fail with
    /// `Error::ConfigurationMissing`.
    async fn get_parameter(&self, name: &str, with_decryption: bool) -> Result<String>;
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account: String,
    pub sub_account: String,
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account", &self.account)
            .field("sub_account", &self.sub_account)
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

pub async fn load_credentials<S>(store: &S, prefix: &str) -> Result<Credentials>
where
    S: ParameterStore + ?Sized,
{
    let param = |key: &str| format!("{prefix}/{key}");

    let account = store.get_parameter(&param("LW_ACCOUNT"), false).await?;
    let sub_account = store.get_parameter(&param("LW_SUBACCOUNT"), false).await?;
    let api_key = store.get_parameter(&param("LW_API_KEY"), true).await?;
    let api_secret = store.get_parameter(&param("LW_API_SECRET"), true).await?;

    debug!(%account, %sub_account, "loaded lacework credentials");

    Ok(Credentials {
        account,
        sub_account,
        api_key,
        api_secret,
    })
}
