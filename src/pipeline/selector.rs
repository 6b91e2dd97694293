//! Active step selection.
//!
//! The `main.steps` configuration value is either the `"all"` sentinel
//! or an explicit comma-separated list. Splitting is exact: no trimming,
//! no deduplication and no registry validation here — the orchestrator
//! validates names and ordering before anything runs.

/// Sentinel selection value meaning "every default step".
pub const ALL_STEPS: &str = "all";

/// Resolves the active step list from the configured selection value.
///
/// `"all"` yields `default_order` unchanged; anything else is split on
/// commas verbatim, preserving the given order and any duplicates.
pub fn select(steps_value: &str, default_order: &[&'static str]) -> Vec<String> {
    if steps_value == ALL_STEPS {
        default_order.iter().map(|name| (*name).to_string()).collect()
    } else {
        steps_value.split(',').map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_ORDER: &[&str] = &[
        "download",
        "basic_cleaning",
        "data_check",
        "data_split",
        "train_random_forest",
    ];

    #[test]
    fn test_all_sentinel_returns_default_order() {
        assert_eq!(select("all", DEFAULT_ORDER), DEFAULT_ORDER);
    }

    #[test]
    fn test_explicit_list_is_split_verbatim() {
        assert_eq!(
            select("download,basic_cleaning", DEFAULT_ORDER),
            vec!["download", "basic_cleaning"]
        );
    }

    #[test]
    fn test_given_order_is_preserved() {
        assert_eq!(
            select("data_check,download", DEFAULT_ORDER),
            vec!["data_check", "download"]
        );
    }

    #[test]
    fn test_duplicates_are_preserved() {
        assert_eq!(
            select("download,download", DEFAULT_ORDER),
            vec!["download", "download"]
        );
    }

    #[test]
    fn test_whitespace_is_not_trimmed() {
        assert_eq!(
            select("download, basic_cleaning", DEFAULT_ORDER),
            vec!["download", " basic_cleaning"]
        );
    }

    #[test]
    fn test_unknown_names_pass_through() {
        assert_eq!(select("nope", DEFAULT_ORDER), vec!["nope"]);
    }
}
