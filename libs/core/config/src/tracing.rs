use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Default filter when `RUST_LOG` is unset (production)
const PRODUCTION_FILTER: &str = "info,tower_http=info,mongodb=warn";
/// Default filter when `RUST_LOG` is unset (development)
const DEVELOPMENT_FILTER: &str = "debug,tower_http=debug,mongodb=info,hyper=info,reqwest=info";

/// Install color-eyre. Call early in `main()`, before any fallible work.
/// Safe to call more than once.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize the global subscriber with span-trace capture.
///
/// - **Production** (`APP_ENV=production`): flattened JSON events, no targets
/// - **Development** (default): pretty, human-readable output
///
/// Both include `tracing_error::ErrorLayer` so eyre reports carry span traces.
/// `RUST_LOG` overrides the default filter. Safe to call more than once
/// (later calls are no-ops, as happens in tests).
pub fn init_tracing(environment: &Environment) {
    let is_production = environment.is_production();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if is_production {
            PRODUCTION_FILTER
        } else {
            DEVELOPMENT_FILTER
        })
    });

    let result = if is_production {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => info!(environment = ?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_multiple_calls() {
        init_tracing(&Environment::Development);
        init_tracing(&Environment::Production);
        init_tracing(&Environment::Development);
    }

    #[test]
    fn test_init_tracing_with_rust_log_env() {
        temp_env::with_var("RUST_LOG", Some("warn"), || {
            init_tracing(&Environment::Production);
        });
    }

    #[test]
    fn test_install_color_eyre_is_idempotent() {
        install_color_eyre();
        install_color_eyre();
    }
}
