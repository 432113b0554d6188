use config_sync_lambda::adapters::aws::AppConfigDataSession;
use config_sync_lambda::handlers::parameter::handle_parameter_event;
use config_sync_lambda::logging;
use config_sync_lambda::response::HandlerResponse;
use config_sync_lambda::settings::process_env;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

async fn handle_request(
    event: LambdaEvent<Value>,
    session: &AppConfigDataSession,
) -> Result<HandlerResponse, Error> {
    Ok(handle_parameter_event(event.payload, &process_env, session))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let session = AppConfigDataSession::new(aws_sdk_appconfigdata::Client::new(&aws_config));
    let session = &session;

    lambda_runtime::run(service_fn(move |event| handle_request(event, session))).await
}
