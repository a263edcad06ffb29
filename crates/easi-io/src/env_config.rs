//! Environment configuration shared by the `easi` binary.
//!
//! Reads `EASI_THREADS` (fallback `RAYON_NUM_THREADS`), `EASI_SEQUENTIAL`
//! and `RUST_LOG`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "easi=info,easi_io=info,easi_engine=info,easi_core=warn";

/// Install the stderr tracing subscriber. Filter from `RUST_LOG`.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "easi=debug,easi_io=debug,easi_engine=debug,easi_core=debug"
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into());

    // A second init (tests, embedding) is not an error
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Thread count from `EASI_THREADS` or `RAYON_NUM_THREADS`, if set.
pub fn thread_count() -> Option<usize> {
    parse_thread_count(
        std::env::var("EASI_THREADS").ok().as_deref(),
        std::env::var("RAYON_NUM_THREADS").ok().as_deref(),
    )
}

/// First value that parses as a positive count; a set but unusable
/// `EASI_THREADS` falls through to `RAYON_NUM_THREADS`.
fn parse_thread_count(easi: Option<&str>, rayon: Option<&str>) -> Option<usize> {
    [easi, rayon]
        .into_iter()
        .flatten()
        .filter_map(|s| s.trim().parse().ok())
        .find(|&n: &usize| n > 0)
}

/// Size the rayon global pool. Tolerates an already-initialised pool.
pub fn init_rayon_threads_lenient(requested: Option<usize>) -> usize {
    let Some(num_threads) = requested.or_else(thread_count) else {
        return rayon::current_num_threads();
    };
    if rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .is_err()
    {
        tracing::debug!("rayon pool already initialised");
    }
    tracing::debug!(threads = rayon::current_num_threads(), "rayon pool");
    rayon::current_num_threads()
}

/// `EASI_SEQUENTIAL` set to anything but `0`/`false`/empty.
pub fn sequential_from_env() -> bool {
    std::env::var("EASI_SEQUENTIAL")
        .ok()
        .as_deref()
        .map_or(false, is_truthy)
}

fn is_truthy(value: &str) -> bool {
    let v = value.trim().to_ascii_lowercase();
    !(v.is_empty() || v == "0" || v == "false")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_thread_count() {
        assert_eq!(parse_thread_count(Some("4"), Some("8")), Some(4));
        assert_eq!(parse_thread_count(None, Some(" 8 ")), Some(8));
        assert_eq!(parse_thread_count(Some("lots"), Some("2")), Some(2));
        assert_eq!(parse_thread_count(Some("0"), None), None);
        assert_eq!(parse_thread_count(Some("-3"), Some("")), None);
        assert_eq!(parse_thread_count(None, None), None);
    }

    #[test]
    fn test_sequential_flag_values() {
        for on in ["1", "true", "yes", " TRUE "] {
            assert!(is_truthy(on), "{on:?}");
        }
        for off in ["", "0", "false", " False "] {
            assert!(!is_truthy(off), "{off:?}");
        }
    }
}
