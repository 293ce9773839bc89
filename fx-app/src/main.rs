//! # FX Converter Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the rate provider and history store adapters
//! - Create the conversion service
//! - Start the HTTP server

mod config;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fx_hex::{ConversionService, inbound::HttpServer};
use fx_provider::HttpRateProvider;
use fx_repo::build_history;

fn init_tracer() -> (sdktrace::Tracer, sdktrace::SdkTracerProvider) {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()
        .expect("failed to create OTLP span exporter");

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    (provider.tracer("fx-converter"), provider)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize OpenTelemetry tracing
    let (otel_tracer, otel_provider) = init_tracer();
    let telemetry = tracing_opentelemetry::layer().with_tracer(otel_tracer);

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fx_app=debug,fx_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting FX converter server on port {}", config.port);
    tracing::info!("Upstream rate provider: {}", config.exchange_api_base);
    match &config.database_url {
        Some(url) => tracing::info!("Using history database: {url}"),
        None => tracing::info!("No DATABASE_URL set, history runs on fallback data"),
    }

    // Build the adapters; the history store connects lazily on first use
    let provider = HttpRateProvider::new(&config.exchange_api_base, config.exchange_api_timeout)?;
    let store = build_history(config.database_url);

    // Create the conversion service
    let service = ConversionService::new(provider, store);

    // Create and run the HTTP server
    let server = HttpServer::new(service);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    let _ = otel_provider.shutdown();
    Ok(())
}
