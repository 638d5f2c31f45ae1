use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::planner::PlannerConfig;

/// Load planner settings from a JSON file.
///
/// Keys left out of the file keep their defaults. The result is validated.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PlannerConfig> {
    let content = fs::read_to_string(path)?;
    let config: PlannerConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Save planner settings as pretty-printed JSON.
pub fn save_config<P: AsRef<Path>>(path: P, config: &PlannerConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedError;
    use crate::planner::MacroBasis;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_save_and_load_roundtrip() {
        let mut config = PlannerConfig::default();
        config.protein_min_pct = 50.0;
        config.macro_basis = MacroBasis::Weight;
        config.best_effort.seed = 7;

        let file = NamedTempFile::new().unwrap();
        save_config(file.path(), &config).unwrap();
        let loaded = load_config(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"carbs_max_pct": 5.0}"#).unwrap();

        let loaded = load_config(file.path()).unwrap();
        assert_eq!(loaded.carbs_max_pct, 5.0);
        assert_eq!(loaded.protein_min_pct, PlannerConfig::default().protein_min_pct);
    }

    #[test]
    fn test_out_of_range_file_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"treat_calorie_cap": 1.5}"#).unwrap();

        assert!(matches!(
            load_config(file.path()),
            Err(FeedError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(matches!(load_config(file.path()), Err(FeedError::Json(_))));
    }
}
