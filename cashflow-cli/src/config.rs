use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use cashflow_ingest::{default_sources, SourceConfig};
use cashflow_reports::ReportFiles;

pub const DEFAULT_CONFIG_FILE: &str = "cashflow.toml";
pub const DATA_DIR_ENV: &str = "CASHFLOW_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the bank and accounting exports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Report file name, written inside the data directory unless absolute.
    #[serde(default = "default_report_file")]
    pub report_file: String,

    #[serde(default)]
    pub reports: ReportFiles,

    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

fn default_report_file() -> String {
    "Financial_Analysis_Report.md".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            report_file: default_report_file(),
            reports: ReportFiles::default(),
            sources: default_sources(),
        }
    }
}

impl Config {
    /// `--data-dir`, then `$CASHFLOW_DATA_DIR`, then the config file,
    /// then the current directory.
    pub fn resolve_data_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
            .or_else(|| self.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn report_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.report_file)
    }
}

pub fn config_path(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

pub fn load_config(p: &Path) -> Result<Config> {
    if !p.exists() {
        log::debug!("no config at {}, using defaults", p.display());
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?)
}

pub fn save_config(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config(p: &Path) -> Result<()> {
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashflow_ingest::LoadStrategy;

    #[test]
    fn test_default_round_trips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.sources, default_sources());
        assert_eq!(back.reports, ReportFiles::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
data_dir = "/srv/exports"

[[sources]]
tag = "Garanti"
patterns = ["*Garanti*.csv"]
strategy = { kind = "native_sheet" }
"#,
        )
        .unwrap();
        assert_eq!(cfg.data_dir, Some(PathBuf::from("/srv/exports")));
        assert_eq!(cfg.sources.len(), 1);
        assert_eq!(cfg.sources[0].strategy, LoadStrategy::NativeSheet);
        assert_eq!(cfg.report_file, "Financial_Analysis_Report.md");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let cfg = load_config(Path::new("/no/such/cashflow.toml")).unwrap();
        assert_eq!(cfg.sources.len(), 3);
    }

    #[test]
    fn test_flag_wins_over_config() {
        let cfg = Config {
            data_dir: Some(PathBuf::from("/from/config")),
            ..Config::default()
        };
        assert_eq!(
            cfg.resolve_data_dir(Some(PathBuf::from("/from/flag"))),
            PathBuf::from("/from/flag")
        );
    }
}
