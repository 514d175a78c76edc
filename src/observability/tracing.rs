use tracing::Span;
use tracing_subscriber::EnvFilter;
use crate::types::ids::SourceId;

/// Install the global subscriber. `RUST_LOG` wins over the `info` default.
/// Calling this twice is harmless; the second call is ignored.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

pub fn trace_pipeline_run(force_write: bool) -> Span {
    tracing::info_span!(
        "pipeline_run",
        force_write = force_write,
    )
}

pub fn trace_adapter_fetch(source: &SourceId) -> Span {
    tracing::info_span!(
        "adapter_fetch",
        source = %source,
    )
}
