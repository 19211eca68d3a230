use anyhow::anyhow;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing_subscriber::EnvFilter;

pub mod aws;
pub mod config;
pub mod core;
pub mod error;
pub mod handler;
pub mod lacework;
pub mod secrets;

use crate::{
    aws::AWS,
    config::Settings,
    core::{CustomResourceEvent, HandlerResponse},
    handler::Handler,
    lacework::LaceworkClient,
};

async fn function_handler(
    event: LambdaEvent<CustomResourceEvent>,
    handler: &Handler<AWS>,
) -> Result<HandlerResponse, Error> {
    let settings = handler.settings();
    let response = handler
        .handle(&event.payload, |credentials| async move {
            LaceworkClient::connect(&credentials, settings).await
        })
        .await?;

    Ok(response)
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing()?;

    let settings = Settings::from_env()?;
    let aws = AWS::new().await;
    let handler = Handler::new(aws, settings);

    run(service_fn(|event| function_handler(event, &handler))).await
}
