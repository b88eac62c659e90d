pub mod ai_report;
pub mod condition_log;
pub mod intake_log;
