use lambda_runtime::{service_fn, Error, LambdaEvent};
use resume_search_lambda::adapters::aws::{DynamoResumeTable, S3ObjectStore};
use resume_search_lambda::config::EnvConfig;
use resume_search_lambda::handlers::finder::handle_finder_event;
use resume_search_lambda::handlers::response::ApiGatewayResponse;
use resume_search_lambda::telemetry::init_logging;
use serde_json::Value;

/// Clients built once per cold start and shared by every invocation.
struct FinderDependencies {
    config: EnvConfig,
    table: DynamoResumeTable,
    links: S3ObjectStore,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &FinderDependencies,
) -> Result<ApiGatewayResponse, Error> {
    let span = tracing::info_span!("finder_invocation", request_id = %event.context.request_id);
    Ok(span.in_scope(|| {
        handle_finder_event(&event.payload, &deps.config, &deps.table, &deps.links)
    }))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = FinderDependencies {
        config: EnvConfig,
        table: DynamoResumeTable::new(aws_sdk_dynamodb::Client::new(&aws_config)),
        links: S3ObjectStore::new(aws_sdk_s3::Client::new(&aws_config)),
    };

    lambda_runtime::run(service_fn(|event| handle_request(event, &deps))).await
}
