//! Observability setup for firstgame: structured logging via `tracing`, with
//! optional span export through OpenTelemetry.

pub mod tracing_setup;
