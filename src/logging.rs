use anyhow::Context;
use tracing_subscriber::{fmt, EnvFilter};

/// Dependencies that log per request or per parsed node; held at `warn` unless `RUST_LOG` says otherwise.
const QUIET_DEPENDENCIES: &[&str] = &["sqlx", "hyper", "hyper_util", "reqwest", "html5ever", "selectors"];

/// Filter used when `RUST_LOG` is unset: `level` for this crate and anything else, `warn` for noisy deps.
pub fn default_directives(level: &str) -> String {
    std::iter::once(level.to_string())
        .chain(QUIET_DEPENDENCIES.iter().map(|d| format!("{d}=warn")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Map `-v` repetitions onto a base level.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global fmt subscriber. Lines carry target, file and line so per-unit
/// warnings (league, team, season) can be traced back to the adapter that raised them.
pub fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(default_directives(level)).context("invalid default log filter")?,
    };
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noisy_dependencies_are_held_at_warn() {
        let d = default_directives("debug");
        assert!(d.starts_with("debug,"));
        assert!(d.contains("sqlx=warn"));
        assert!(EnvFilter::try_new(&d).is_ok());
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for_verbosity(0), "info");
        assert_eq!(level_for_verbosity(1), "debug");
        assert_eq!(level_for_verbosity(4), "trace");
    }
}
