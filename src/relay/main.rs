use std::sync::Arc;

use aws_sdk_secretsmanager::config::Region;
use lambda_http::{run, service_fn, Error};

use dingtalk_support_relay::handler::function_handler;
use dingtalk_support_relay::publisher::WebhookPublisher;
use dingtalk_support_relay::secrets::SecretsManagerProvider;
use dingtalk_support_relay::support::AwsSupportClient;
use dingtalk_support_relay::{Relay, RelayConfig};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .without_time()
        .init();

    let config = RelayConfig::from_env()?;
    let shared = aws_config::load_from_env().await;

    let mut secrets_config = aws_sdk_secretsmanager::config::Builder::from(&shared);
    if let Some(region) = &config.secrets_region {
        secrets_config = secrets_config.region(Region::new(region.clone()));
    }
    let secrets = SecretsManagerProvider::new(
        aws_sdk_secretsmanager::Client::from_conf(secrets_config.build()),
        config.secret_id.clone(),
    );

    let relay = Relay::new(
        Arc::new(secrets),
        Arc::new(AwsSupportClient::from_shared_config(&shared, &config.support_region)),
        Arc::new(WebhookPublisher::new(config.webhook_url.clone())),
    );
    let relay = &relay;

    run(service_fn(move |event| async move { function_handler(relay, event).await })).await
}
