use async_trait::async_trait;
use aws_config::BehaviorVersion;

use crate::{error::Result, secrets::ParameterStore};

pub(crate) mod ssm;

pub struct AWS {
    pub ssm_client: aws_sdk_ssm::Client,
}

impl AWS {
    pub async fn new() -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::v2023_11_09())
            .load()
            .await;

        let ssm_client = aws_sdk_ssm::Client::new(&sdk_config);

        Self { ssm_client }
    }
}

#[async_trait]
impl ParameterStore for AWS {
    async fn get_parameter(&self, name: &str, with_decryption: bool) -> Result<String> {
        ssm::get_parameter(&self.ssm_client, name, with_decryption).await
    }
}
