use config_sync_lambda::adapters::aws::{S3ObjectStore, SageMakerTrainingJobs};
use config_sync_lambda::handlers::training::handle_training_event;
use config_sync_lambda::logging;
use config_sync_lambda::response::HandlerResponse;
use config_sync_lambda::settings::process_env;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

struct RuntimeDependencies {
    store: S3ObjectStore,
    launcher: SageMakerTrainingJobs,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<HandlerResponse, Error> {
    Ok(handle_training_event(
        event.payload,
        &process_env,
        &deps.store,
        &deps.launcher,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        store: S3ObjectStore::new(aws_sdk_s3::Client::new(&aws_config)),
        launcher: SageMakerTrainingJobs::new(aws_sdk_sagemaker::Client::new(&aws_config)),
    };
    let deps = &deps;

    lambda_runtime::run(service_fn(move |event| handle_request(event, deps))).await
}
