//! 顧客の活動状況と所見

use crate::config::ActivityWindows;
use chrono::NaiveDate;
use serde::Serialize;

/// 最終活動日からの経過による区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ActivityStatus {
    Active,
    #[serde(rename = "At Risk")]
    AtRisk,
    Dormant,
    Unknown,
}

impl ActivityStatus {
    pub const ALL: [ActivityStatus; 4] = [
        ActivityStatus::Active,
        ActivityStatus::AtRisk,
        ActivityStatus::Dormant,
        ActivityStatus::Unknown,
    ];

    pub fn classify(
        last_active: Option<NaiveDate>,
        today: NaiveDate,
        windows: &ActivityWindows,
    ) -> Self {
        let Some(last) = last_active else {
            return ActivityStatus::Unknown;
        };

        let days_inactive = (today - last).num_days();
        if days_inactive < windows.active_days {
            ActivityStatus::Active
        } else if days_inactive < windows.at_risk_days {
            ActivityStatus::AtRisk
        } else {
            ActivityStatus::Dormant
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityStatus::Active => "Active",
            ActivityStatus::AtRisk => "At Risk",
            ActivityStatus::Dormant => "Dormant",
            ActivityStatus::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 明細行ごとの所見
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Insight {
    /// 支払いはあるが90日以上ログインなし（自動更新の可能性）
    #[serde(rename = "Churn Risk")]
    ChurnRisk,
    /// 支払いはあるが活動記録なし
    #[serde(rename = "Ghost User")]
    GhostUser,
    /// 累計支払額がこの請求の2倍超
    #[serde(rename = "Loyal Customer")]
    LoyalCustomer,
    /// CRMに該当なし（新規顧客か法人名の違い）
    #[serde(rename = "No CRM Match")]
    NoMatch,
}

impl Insight {
    /// 先に該当した所見を返す
    pub fn evaluate(
        matched: bool,
        status: ActivityStatus,
        amount: f64,
        lifetime_value: f64,
    ) -> Option<Self> {
        if !matched {
            return Some(Insight::NoMatch);
        }
        match status {
            ActivityStatus::Dormant => Some(Insight::ChurnRisk),
            ActivityStatus::Unknown if amount > 0.0 => Some(Insight::GhostUser),
            _ if lifetime_value > amount * 2.0 => Some(Insight::LoyalCustomer),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Insight::ChurnRisk => "Churn Risk",
            Insight::GhostUser => "Ghost User",
            Insight::LoyalCustomer => "Loyal Customer",
            Insight::NoMatch => "No CRM Match",
        }
    }
}

impl std::fmt::Display for Insight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
