pub mod scheduler;
pub mod synthesizer;

pub use synthesizer::{ReportSynthesizer, SynthesisError};
