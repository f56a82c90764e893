use crate::error::{ReconcileError, Result};
use costo_match_common::MatchConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 名前照合の設定
    pub matcher: MatchConfig,
    /// CRMエクスポートの列名
    pub crm_columns: CrmColumns,
    /// 活動状況の判定日数
    pub activity: ActivityWindows,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrmColumns {
    pub name: String,
    pub lifetime_value: String,
    pub last_active: String,
}

impl Default for CrmColumns {
    fn default() -> Self {
        Self {
            name: "Fullname".into(),
            lifetime_value: "Total payments amount".into(),
            last_active: "Last activity date".into(),
        }
    }
}

/// 最終活動からの経過日数による区分
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityWindows {
    /// これ未満なら Active
    pub active_days: i64,
    /// これ未満なら At Risk、以上は Dormant
    pub at_risk_days: i64,
}

impl Default for ActivityWindows {
    fn default() -> Self {
        Self {
            active_days: 30,
            at_risk_days: 90,
        }
    }
}

impl Config {
    /// 設定ファイルを読み込む（なければ既定値）
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            if path.is_some() {
                return Err(ReconcileError::FileNotFound(config_path.display().to_string()));
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        tracing::debug!(path = %config_path.display(), "config loaded");
        Ok(config)
    }

    /// 書き込み前の読み込み（指定パスがまだなくても既定値から始める）
    pub fn load_for_update(path: Option<&Path>) -> Result<Self> {
        match Self::load(path) {
            Err(ReconcileError::FileNotFound(missing)) => {
                tracing::debug!(path = %missing, "config file will be created");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(config_path)
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| {
            ReconcileError::Config("ホームディレクトリが見つかりません".into())
        })?;
        Ok(home.join(".config").join("costo-reconcile").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        self.matcher.validate()?;
        if self.activity.active_days > self.activity.at_risk_days {
            return Err(ReconcileError::Config(format!(
                "active_days ({}) は at_risk_days ({}) 以下にしてください",
                self.activity.active_days, self.activity.at_risk_days
            )));
        }
        Ok(())
    }

    pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
        self.matcher.threshold = threshold;
        self.validate()
    }
}
