use crate::utils::env::get_env;

use opentelemetry::trace::TracerProvider;
use opentelemetry::KeyValue;
use opentelemetry_sdk::trace as sdktrace;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::{fmt, layer::SubscriberExt, Registry};

/// Installs the fmt + X-Ray tracing stack. `function_name` is used when
/// `SERVICE_NAME` is not set.
pub fn init_tracing(function_name: &str) -> Result<(), SetGlobalDefaultError> {
    let service_name = get_env("SERVICE_NAME", function_name);
    let service_version = get_env("SERVICE_VERSION", env!("CARGO_PKG_VERSION"));
    let service_environment = get_env("SERVICE_ENVIRONMENT", "local");

    let tracer_provider = sdktrace::TracerProvider::builder()
        .with_config(
            sdktrace::Config::default()
                .with_id_generator(opentelemetry_aws::trace::XrayIdGenerator::default())
                .with_resource(opentelemetry_sdk::resource::Resource::new(vec![
                    KeyValue::new("service.name", service_name.clone()),
                    KeyValue::new("service.version", service_version),
                    KeyValue::new("environment", service_environment),
                    KeyValue::new("faas.name", function_name.to_string()),
                ])),
        )
        .build();

    let tracer = tracer_provider
        .tracer_builder(service_name)
        .with_version(env!("CARGO_PKG_VERSION"))
        .build();

    let telemetry_layer = tracing_opentelemetry::layer().with_tracer(tracer);
    let subscriber = Registry::default()
        .with(telemetry_layer)
        .with(fmt::layer().without_time().with_target(false));
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!("Tracing initialized for {}", function_name);
    Ok(())
}
