//! Application configuration loaded from environment variables.
//!
//! All settings are optional:
//! - `INSTANTEX_MARKET` — id of the market the swap form opens on
//! - `INSTANTEX_TICK_MS` — feed/UI tick interval in milliseconds

/// Market selected when no override is provided.
const DEFAULT_MARKET: &str = "btcusd";

/// Default feed/UI tick interval in milliseconds.
const DEFAULT_TICK_MS: u64 = 250;

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    /// Id of the market the swap form opens on.
    pub market: String,
    /// Feed/UI tick interval in milliseconds.
    pub tick_ms: u64,
}

/// Loads the application configuration from environment variables.
///
/// The startup market defaults to `btcusd` and can be overridden with
/// `INSTANTEX_MARKET`. The tick interval defaults to 250ms and can be
/// overridden with `INSTANTEX_TICK_MS`.
///
/// # Errors
///
/// Returns [`InstantexError::Config`](crate::InstantexError::Config) if
/// `INSTANTEX_TICK_MS` is set but is not a positive integer.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let market = non_empty_var("INSTANTEX_MARKET")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| DEFAULT_MARKET.to_string());

    let tick_ms = match non_empty_var("INSTANTEX_TICK_MS") {
        Some(raw) => match raw.parse::<u64>() {
            Ok(ms) if ms > 0 => ms,
            _ => {
                return Err(crate::InstantexError::Config(format!(
                    "INSTANTEX_TICK_MS must be a positive integer, got {raw:?}"
                )));
            }
        },
        None => DEFAULT_TICK_MS,
    };

    Ok(AppConfig { market, tick_ms })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper that temporarily sets env vars, runs `f`, then restores originals.
    ///
    /// # Safety
    ///
    /// Tests using this helper must run with `--test-threads=1` or otherwise
    /// ensure no other threads read these env vars concurrently.
    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let originals: Vec<(&str, Option<String>)> = vars
            .iter()
            .map(|(k, _)| (*k, std::env::var(k).ok()))
            .collect();

        for (k, v) in vars {
            // SAFETY: config tests run single-threaded (see test runner config).
            unsafe {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }

        f();

        for (k, original) in originals {
            // SAFETY: restoring original values, same single-threaded context.
            unsafe {
                match original {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn defaults_without_env_vars() {
        with_env(
            &[("INSTANTEX_MARKET", None), ("INSTANTEX_TICK_MS", None)],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.market, DEFAULT_MARKET);
                assert_eq!(config.tick_ms, DEFAULT_TICK_MS);
            },
        );
    }

    #[test]
    fn market_override_is_lowercased() {
        with_env(
            &[("INSTANTEX_MARKET", Some("ETHUSD")), ("INSTANTEX_TICK_MS", None)],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.market, "ethusd");
            },
        );
    }

    #[test]
    fn custom_tick_interval() {
        with_env(
            &[("INSTANTEX_MARKET", None), ("INSTANTEX_TICK_MS", Some("500"))],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.tick_ms, 500);
            },
        );
    }

    #[test]
    fn rejects_non_numeric_tick_interval() {
        with_env(
            &[("INSTANTEX_MARKET", None), ("INSTANTEX_TICK_MS", Some("fast"))],
            || {
                let err = fetch_config().unwrap_err();
                assert!(err.to_string().contains("INSTANTEX_TICK_MS"));
            },
        );
    }

    #[test]
    fn rejects_zero_tick_interval() {
        with_env(
            &[("INSTANTEX_MARKET", None), ("INSTANTEX_TICK_MS", Some("0"))],
            || {
                assert!(fetch_config().is_err());
            },
        );
    }

    #[test]
    fn empty_values_treated_as_absent() {
        with_env(
            &[("INSTANTEX_MARKET", Some("")), ("INSTANTEX_TICK_MS", Some(""))],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.market, DEFAULT_MARKET);
                assert_eq!(config.tick_ms, DEFAULT_TICK_MS);
            },
        );
    }
}
