//! Small shared helpers.

use std::collections::BTreeSet;
use std::fmt::Display;

/// Convert a Result to an Option, logging errors at debug level.
///
/// Use with `filter_map` when iterating over walker or parser results where
/// individual failures are expected and should not stop the run.
pub fn log_filter_error<T, E: Display>(result: Result<T, E>, context: &str) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!("{}: {}", context, e);
            None
        }
    }
}

/// Like log_filter_error but logs at warn level for more important operations.
pub fn log_filter_warn<T, E: Display>(result: Result<T, E>, context: &str) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("{}: {}", context, e);
            None
        }
    }
}

/// Deduplicate and sort, materializing the set at the boundary.
pub fn sorted_unique<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items
        .into_iter()
        .map(Into::into)
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Normalize a path string to forward slashes.
pub fn to_slash(path: &std::path::Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_unique() {
        let v = sorted_unique(["b", "a", "b", "c"]);
        assert_eq!(v, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_log_filter_error() {
        let ok: Result<i32, String> = Ok(1);
        let err: Result<i32, String> = Err("boom".into());
        assert_eq!(log_filter_error(ok, "ctx"), Some(1));
        assert_eq!(log_filter_warn(err, "ctx"), None);
    }
}
