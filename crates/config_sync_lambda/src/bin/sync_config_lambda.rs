use config_sync_core::deployment::WatchPolicy;
use config_sync_lambda::adapters::aws::{AppConfigDistribution, S3ObjectStore};
use config_sync_lambda::handlers::sync::{handle_sync_event, SyncContext};
use config_sync_lambda::logging;
use config_sync_lambda::response::HandlerResponse;
use config_sync_lambda::settings::{process_env, watch_policy};
use config_sync_lambda::watcher::SystemPollClock;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

struct RuntimeDependencies {
    store: S3ObjectStore,
    distribution: AppConfigDistribution,
    policy: WatchPolicy,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<HandlerResponse, Error> {
    let clock = SystemPollClock::start();
    let context = SyncContext {
        store: &deps.store,
        distribution: &deps.distribution,
        clock: &clock,
        policy: deps.policy,
    };
    Ok(handle_sync_event(event.payload, &process_env, &context))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        store: S3ObjectStore::new(aws_sdk_s3::Client::new(&aws_config)),
        distribution: AppConfigDistribution::new(aws_sdk_appconfig::Client::new(&aws_config)),
        policy: watch_policy(&process_env),
    };
    let deps = &deps;

    lambda_runtime::run(service_fn(move |event| handle_request(event, deps))).await
}
