use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Self-reported magnitude of water consumed in one intake event.
///
/// # Examples
///
/// ```
/// use waterlog_common::types::IntakeLevel;
///
/// let level: IntakeLevel = "medium".parse().unwrap();
/// assert_eq!(level, IntakeLevel::Medium);
/// assert_eq!(level.to_string(), "medium");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntakeLevel {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for IntakeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntakeLevel::High => write!(f, "high"),
            IntakeLevel::Medium => write!(f, "medium"),
            IntakeLevel::Low => write!(f, "low"),
        }
    }
}

impl std::str::FromStr for IntakeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(IntakeLevel::High),
            "medium" => Ok(IntakeLevel::Medium),
            "low" => Ok(IntakeLevel::Low),
            _ => Err(format!("unknown intake level: {s}")),
        }
    }
}

/// Self-reported daily wellness category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionType {
    Fatigue,
    Swelling,
    Good,
}

impl std::fmt::Display for ConditionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionType::Fatigue => write!(f, "fatigue"),
            ConditionType::Swelling => write!(f, "swelling"),
            ConditionType::Good => write!(f, "good"),
        }
    }
}

impl std::str::FromStr for ConditionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fatigue" => Ok(ConditionType::Fatigue),
            "swelling" => Ok(ConditionType::Swelling),
            "good" => Ok(ConditionType::Good),
            _ => Err(format!("unknown condition type: {s}")),
        }
    }
}

/// Classification of a synthesized report: `weekly` comes from the periodic
/// scheduler, `manual` from an explicit user request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Weekly,
    Manual,
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportType::Weekly => write!(f, "weekly"),
            ReportType::Manual => write!(f, "manual"),
        }
    }
}

impl std::str::FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(ReportType::Weekly),
            "manual" => Ok(ReportType::Manual),
            _ => Err(format!("unknown report type: {s}")),
        }
    }
}

/// One logged water-intake event. Immutable once created, except deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeLogRow {
    pub id: String,
    pub account_id: String,
    pub level: IntakeLevel,
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Daily condition entry. At most one per `(account_id, log_date)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionLogRow {
    pub id: String,
    pub account_id: String,
    pub condition_type: ConditionType,
    pub note: Option<String>,
    pub log_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A persisted AI-generated report over one synthesis window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIReportRow {
    pub id: String,
    pub account_id: String,
    pub content: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub report_type: ReportType,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a freshly generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAIReportRequest {
    pub account_id: String,
    pub content: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub report_type: ReportType,
}
