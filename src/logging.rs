use tracing_subscriber::EnvFilter;

/// Crates that should receive log output.
const CRATE_TARGETS: &[&str] = &["veenzo", "veenzo_core", "veenzo_provider_google"];

/// Initialize tracing on stderr based on CLI verbosity level.
///
/// Mapping:
/// - 0 (none) -> warn
/// - 1 (-v)   -> info
/// - 2 (-vv)  -> debug
/// - 3+ (-vvv)-> trace
///
/// `VEENZO_LOG` overrides the CLI flag if set.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env("VEENZO_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn default_filter(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(
            default_filter(0),
            "veenzo=warn,veenzo_core=warn,veenzo_provider_google=warn"
        );
        assert!(default_filter(2).contains("veenzo_core=debug"));
        assert!(default_filter(9).contains("veenzo=trace"));
    }
}
