use config_sync_lambda::adapters::aws::{AppConfigDistribution, S3ObjectStore};
use config_sync_lambda::handlers::direct_deploy::handle_direct_deploy_event;
use config_sync_lambda::logging;
use config_sync_lambda::response::HandlerResponse;
use config_sync_lambda::settings::process_env;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

struct RuntimeDependencies {
    store: S3ObjectStore,
    distribution: AppConfigDistribution,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<HandlerResponse, Error> {
    Ok(handle_direct_deploy_event(
        event.payload,
        &process_env,
        &deps.store,
        &deps.distribution,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        store: S3ObjectStore::new(aws_sdk_s3::Client::new(&aws_config)),
        distribution: AppConfigDistribution::new(aws_sdk_appconfig::Client::new(&aws_config)),
    };
    let deps = &deps;

    lambda_runtime::run(service_fn(move |event| handle_request(event, deps))).await
}
