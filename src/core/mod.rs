use std::{fmt, str::FromStr};

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Integration type tag for AWS Config compliance integrations.
pub const AWS_CFG: &str = "AWS_CFG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

impl FromStr for RequestType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Create" => Ok(Self::Create),
            "Update" => Ok(Self::Update),
            "Delete" => Ok(Self::Delete),
            other => Err(Error::InvalidRequestType(other.to_string())),
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceProperties {
    pub role_arn: String,
    #[serde(default)]
    pub external_id: Option<String>,
}

/// Custom resource event as delivered by the CDK Provider framework.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceEvent {
    pub request_type: String,
    pub resource_properties: ResourceProperties,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub stack_id: Option<String>,
    #[serde(default)]
    pub logical_resource_id: Option<String>,
    #[serde(default)]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_type: Option<String>,
}

impl CustomResourceEvent {
    pub fn request_type(&self) -> Result<RequestType> {
        self.request_type.parse()
    }

    pub fn role_arn(&self) -> &str {
        &self.resource_properties.role_arn
    }

    pub fn external_id(&self) -> Result<&str> {
        self.resource_properties
            .external_id
            .as_deref()
            .ok_or(Error::MissingProperty("ExternalId"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CrossAccountCredentials {
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub role_arn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct IntegrationData {
    /// Absent on integration types that do not assume a cross-account role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_account_credentials: Option<CrossAccountCredentials>,
}

impl IntegrationData {
    pub fn cross_account(external_id: &str, role_arn: &str) -> Self {
        Self {
            cross_account_credentials: Some(CrossAccountCredentials {
                external_id: external_id.to_string(),
                role_arn: role_arn.to_string(),
            }),
        }
    }

    pub fn role_arn(&self) -> Option<&str> {
        self.cross_account_credentials
            .as_ref()
            .map(|c| c.role_arn.as_str())
            .filter(|arn| !arn.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IntegrationRecord {
    #[serde(rename = "INTG_GUID")]
    pub guid: String,
    #[serde(rename = "NAME", default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(rename = "TYPE")]
    pub type_tag: String,
    #[serde(rename = "ENABLED", default, deserialize_with = "flag::deserialize")]
    pub enabled: bool,
    #[serde(rename = "DATA", default, deserialize_with = "lenient")]
    pub data: IntegrationData,
}

/// Falls back to the default for null or unexpectedly shaped values. Records of
/// types other than `AWS_CFG` are listed alongside ours and only need a guid and type.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Request body for creating or updating an integration.
#[derive(Debug, Clone, Serialize)]
pub struct IntegrationRequest<'a> {
    #[serde(rename = "NAME")]
    pub name: &'a str,
    #[serde(rename = "TYPE")]
    pub type_tag: &'a str,
    #[serde(rename = "ENABLED", serialize_with = "flag::serialize")]
    pub enabled: bool,
    #[serde(rename = "DATA")]
    pub data: &'a IntegrationData,
}

/// Lacework encodes booleans as 0/1 on the v1 API.
mod flag {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Str(String),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Flag::deserialize(deserializer)? {
            Flag::Bool(b) => b,
            Flag::Int(i) => i != 0,
            Flag::Str(s) => matches!(s.as_str(), "1" | "true" | "True"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseData {
    pub integration_guid: String,
    pub integration_name: String,
}

impl From<&IntegrationRecord> for ResponseData {
    fn from(record: &IntegrationRecord) -> Self {
        Self {
            integration_guid: record.guid.clone(),
            integration_name: record.name.clone(),
        }
    }
}

/// Reply handed back to the Provider framework.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HandlerResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}
