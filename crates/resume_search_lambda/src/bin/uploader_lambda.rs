use lambda_runtime::{service_fn, Error, LambdaEvent};
use resume_search_lambda::adapters::aws::S3ObjectStore;
use resume_search_lambda::config::EnvConfig;
use resume_search_lambda::handlers::response::ApiGatewayResponse;
use resume_search_lambda::handlers::uploader::{handle_upload_event, RandomObjectIds};
use resume_search_lambda::telemetry::init_logging;
use serde_json::Value;

struct UploaderDependencies {
    config: EnvConfig,
    store: S3ObjectStore,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &UploaderDependencies,
) -> Result<ApiGatewayResponse, Error> {
    let span = tracing::info_span!("uploader_invocation", request_id = %event.context.request_id);
    Ok(span.in_scope(|| {
        handle_upload_event(&event.payload, &deps.config, &deps.store, &RandomObjectIds)
    }))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = UploaderDependencies {
        config: EnvConfig,
        store: S3ObjectStore::new(aws_sdk_s3::Client::new(&aws_config)),
    };

    lambda_runtime::run(service_fn(|event| handle_request(event, &deps))).await
}
