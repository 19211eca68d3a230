use aws_sdk_ssm::{error::DisplayErrorContext, types::Parameter};

use crate::error::{Error, Result};

pub(crate) async fn get_parameter(
    client: &aws_sdk_ssm::Client,
    name: &str,
    with_decryption: bool,
) -> Result<String> {
    let response = client
        .get_parameter()
        .name(name)
        .with_decryption(with_decryption)
        .send()
        .await
        .map_err(|err| {
            let not_found = err
                .as_service_error()
                .map(|e| e.is_parameter_not_found())
                .unwrap_or(false);

            if not_found {
                Error::ConfigurationMissing(name.to_string())
            } else {
                Error::ParameterStore {
                    name: name.to_string(),
                    message: DisplayErrorContext(&err).to_string(),
                }
            }
        })?;

    parameter_value(name, response.parameter)
}

fn parameter_value(name: &str, parameter: Option<Parameter>) -> Result<String> {
    parameter
        .and_then(|p| p.value)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::ConfigurationMissing(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_stored_value() {
        let parameter = Parameter::builder().value("acme").build();

        assert_eq!(
            parameter_value("/lacework/LW_ACCOUNT", Some(parameter)).unwrap(),
            "acme"
        );
    }

    #[test]
    fn empty_or_absent_value_is_missing_configuration() {
        let empty = Parameter::builder().value("").build();
        let valueless = Parameter::builder().name("/lacework/LW_ACCOUNT").build();

        for parameter in [Some(empty), Some(valueless), None] {
            let err = parameter_value("/lacework/LW_ACCOUNT", parameter).unwrap_err();
            assert!(matches!(err, Error::ConfigurationMissing(name) if name == "/lacework/LW_ACCOUNT"));
        }
    }
}
