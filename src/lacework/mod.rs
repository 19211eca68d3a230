//! Client for the Lacework v1 external integrations API.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    config::Settings,
    core::{IntegrationData, IntegrationRecord, IntegrationRequest},
    error::{Error, Result},
    secrets::Credentials,
};

mod locator;

pub use locator::find_integration;

const TOKEN_EXPIRY_SECS: u64 = 3600;
const INTEGRATIONS_PATH: &str = "/api/v1/external/integrations";

/// Remote operations on integration records.
#[async_trait]
pub trait IntegrationApi: Send + Sync {
    async fn list(&self) -> Result<Vec<IntegrationRecord>>;

    /// Creates a record. Returns it when the service echoes it back.
    async fn create(
        &self,
        name: &str,
        type_tag: &str,
        enabled: bool,
        data: &IntegrationData,
    ) -> Result<Option<IntegrationRecord>>;

    /// Replaces every mutable field of the record identified by `guid`.
    async fn update(
        &self,
        guid: &str,
        name: &str,
        type_tag: &str,
        enabled: bool,
        data: &IntegrationData,
    ) -> Result<()>;

    async fn delete(&self, guid: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    #[serde(default)]
    ok: Option<bool>,
    #[serde(default)]
    message: Option<String>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> Result<Vec<T>> {
        match self.ok {
            Some(false) => Err(Error::RemoteApi {
                status: None,
                message: self.message.unwrap_or_else(|| "request was not ok".to_string()),
            }),
            _ => Ok(self.data),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    key_id: &'a str,
    expiry_time: u64,
}

#[derive(Debug, Deserialize)]
struct AccessToken {
    token: String,
}

pub struct LaceworkClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    sub_account: Option<String>,
}

impl LaceworkClient {
    /// Builds a client and exchanges the API key and secret for an access token.
    pub async fn connect(credentials: &Credentials, settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;

        let base_url = settings
            .api_url
            .clone()
            .unwrap_or_else(|| account_url(&credentials.account))
            .trim_end_matches('/')
            .to_string();

        let sub_account = Some(credentials.sub_account.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let token = access_token(&http, &base_url, credentials).await?;
        debug!(%base_url, "obtained lacework access token");

        Ok(Self {
            http,
            base_url,
            token,
            sub_account,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token);

        match &self.sub_account {
            Some(sub_account) => builder.header("Account-Name", sub_account),
            None => builder,
        }
    }
}

#[async_trait]
impl IntegrationApi for LaceworkClient {
    async fn list(&self) -> Result<Vec<IntegrationRecord>> {
        let response = send(self.request(Method::GET, INTEGRATIONS_PATH)).await?;
        parse::<IntegrationRecord>(response).await
    }

    async fn create(
        &self,
        name: &str,
        type_tag: &str,
        enabled: bool,
        data: &IntegrationData,
    ) -> Result<Option<IntegrationRecord>> {
        let body = IntegrationRequest {
            name,
            type_tag,
            enabled,
            data,
        };
        let response = send(self.request(Method::POST, INTEGRATIONS_PATH).json(&body)).await?;

        // The record exists once the POST succeeds; an unreadable body must not fail it.
        let text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<Envelope<IntegrationRecord>>(&text) {
            Ok(envelope) => Ok(envelope.into_data()?.into_iter().next()),
            Err(err) => {
                warn!(
                    %name,
                    error = %err,
                    "created integration but could not read the response"
                );
                Ok(None)
            }
        }
    }

    async fn update(
        &self,
        guid: &str,
        name: &str,
        type_tag: &str,
        enabled: bool,
        data: &IntegrationData,
    ) -> Result<()> {
        let body = IntegrationRequest {
            name,
            type_tag,
            enabled,
            data,
        };
        let path = format!("{INTEGRATIONS_PATH}/{guid}");
        send(self.request(Method::PATCH, &path).json(&body)).await?;
        Ok(())
    }

    async fn delete(&self, guid: &str) -> Result<()> {
        let path = format!("{INTEGRATIONS_PATH}/{guid}");
        send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }
}

fn account_url(account: &str) -> String {
    let account = account.trim().trim_end_matches(".lacework.net");
    format!("https://{account}.lacework.net")
}

async fn access_token(
    http: &reqwest::Client,
    base_url: &str,
    credentials: &Credentials,
) -> Result<String> {
    let request = http
        .post(format!("{base_url}/api/v1/access/tokens"))
        .header("X-LW-UAKS", &credentials.api_secret)
        .json(&TokenRequest {
            key_id: &credentials.api_key,
            expiry_time: TOKEN_EXPIRY_SECS,
        });

    let response = send(request).await?;

    parse::<AccessToken>(response)
        .await?
        .into_iter()
        .next()
        .map(|t| t.token)
        .ok_or_else(|| Error::RemoteApi {
            status: None,
            message: "token response contained no token".to_string(),
        })
}

async fn send(request: RequestBuilder) -> Result<Response> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(Error::RemoteApi {
            status: Some(status.as_u16()),
            message,
        })
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<Vec<T>> {
    response.json::<Envelope<T>>().await?.into_data()
}
