//! File persistence and serialization configuration

use crate::utils::TimeUtils;

pub struct PersistenceConfig {
    /// Directory holding cached breadth series
    pub series_directory: &'static str,
    /// Base filename for cache files (without extension)
    pub series_filename_without_ext: &'static str,
    /// Current version of the cache serialization format
    pub series_version: f64,
    /// Optional hand-written JSON collection, looked up in `series_directory`
    pub json_import_filename: &'static str,
    /// Path for saving/loading viewer state
    pub app_state_path: &'static str,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    series_directory: "breadth_data",
    series_filename_without_ext: "breadth",
    series_version: 1.0,
    json_import_filename: "breadth_import.json",
    app_state_path: ".states.json",
};

/// Generate interval-specific cache filename
/// Example: "breadth_15m_v1.bin"
pub fn series_cache_filename(interval_ms: i64) -> String {
    let interval_str = TimeUtils::interval_to_string(interval_ms);
    format!(
        "{}_{}_v{}.bin",
        PERSISTENCE.series_filename_without_ext, interval_str, PERSISTENCE.series_version
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_filename_carries_interval_and_version() {
        assert_eq!(
            series_cache_filename(TimeUtils::MS_IN_15_MIN),
            "breadth_15m_v1.bin"
        );
    }
}
