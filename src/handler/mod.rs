use std::future::Future;

use tracing::info;

use crate::{
    config::Settings,
    core::{
        CustomResourceEvent, HandlerResponse, IntegrationData, RequestType, ResponseData, AWS_CFG,
    },
    error::{Error, Result},
    lacework::{find_integration, IntegrationApi},
    secrets::{load_credentials, Credentials, ParameterStore},
};

/// Reconciles the AWS Config integration with a custom resource lifecycle event.
pub struct Handler<S> {
    store: S,
    settings: Settings,
}

impl<S: ParameterStore> Handler<S> {
    pub fn new(store: S, settings: Settings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Loads credentials, builds a client through `connect` and applies the event.
    ///
    /// The request type and required properties are validated before anything
    /// remote is touched.
    pub async fn handle<A, F, Fut>(
        &self,
        event: &CustomResourceEvent,
        connect: F,
    ) -> Result<HandlerResponse>
    where
        A: IntegrationApi,
        F: FnOnce(Credentials) -> Fut,
        Fut: Future<Output = Result<A>>,
    {
        let request_type = event.request_type()?;
        info!(
            %request_type,
            role_arn = event.role_arn(),
            request_id = event.request_id.as_deref().unwrap_or_default(),
            stack_id = event.stack_id.as_deref().unwrap_or_default(),
            logical_resource_id = event.logical_resource_id.as_deref().unwrap_or_default(),
            physical_resource_id = event.physical_resource_id.as_deref().unwrap_or_default(),
            resource_type = event.resource_type.as_deref().unwrap_or_default(),
            "received custom resource event"
        );

        if request_type != RequestType::Delete {
            event.external_id()?;
        }

        let credentials = load_credentials(&self.store, &self.settings.parameter_prefix).await?;
        let client = connect(credentials).await?;

        match request_type {
            RequestType::Create => {
                on_create(&client, &self.settings, event.role_arn(), event.external_id()?).await
            }
            RequestType::Update => {
                on_update(&client, event.role_arn(), event.external_id()?).await
            }
            RequestType::Delete => on_delete(&client, event.role_arn()).await,
        }
    }
}

async fn on_create<A: IntegrationApi>(
    client: &A,
    settings: &Settings,
    role_arn: &str,
    external_id: &str,
) -> Result<HandlerResponse> {
    let environment = settings
        .environment
        .as_deref()
        .ok_or_else(|| Error::ConfigurationMissing("ENVIRONMENT".to_string()))?;
    let name = format!("{environment}-Config");
    let data = IntegrationData::cross_account(external_id, role_arn);

    info!(%name, "Started creating AWS Config integration");
    let created = client.create(&name, AWS_CFG, true, &data).await?;
    info!(%name, "Finished creating AWS Config integration");

    Ok(HandlerResponse {
        data: created.as_ref().map(ResponseData::from),
    })
}

async fn on_update<A: IntegrationApi>(
    client: &A,
    role_arn: &str,
    external_id: &str,
) -> Result<HandlerResponse> {
    let records = client.list().await?;
    let integration = find_integration(&records, AWS_CFG, role_arn)?;
    let data = IntegrationData::cross_account(external_id, role_arn);

    info!(
        guid = %integration.guid,
        name = %integration.name,
        "Started updating AWS Config integration"
    );
    client
        .update(
            &integration.guid,
            &integration.name,
            AWS_CFG,
            integration.enabled,
            &data,
        )
        .await?;
    info!(
        guid = %integration.guid,
        name = %integration.name,
        "Finished updating AWS Config integration"
    );

    Ok(HandlerResponse {
        data: Some(integration.into()),
    })
}

async fn on_delete<A: IntegrationApi>(client: &A, role_arn: &str) -> Result<HandlerResponse> {
    let records = client.list().await?;
    let integration = find_integration(&records, AWS_CFG, role_arn)?;

    info!(guid = %integration.guid, "Started deleting integration {}", integration.name);
    client.delete(&integration.guid).await?;
    info!(guid = %integration.guid, "Finished deleting integration {}", integration.name);

    Ok(HandlerResponse {
        data: Some(integration.into()),
    })
}
