pub mod error;
pub mod generator;
pub mod models;
pub mod prompt;
pub mod providers;

pub use error::{AiError, Result};
pub use generator::TextGenerator;
pub use prompt::{build_report_prompt, ConditionEntry, IntakeEntry, ReportInput};
pub use providers::gemini::GeminiProvider;
