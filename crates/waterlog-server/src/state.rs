use crate::config::ServerConfig;
use crate::events::EventSender;
use crate::report::synthesizer::ReportSynthesizer;
use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;
use waterlog_ai::TextGenerator;
use waterlog_storage::WaterStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<WaterStore>,
    pub generator: Arc<dyn TextGenerator>,
    pub events: EventSender,
    pub config: Arc<ServerConfig>,
    pub tz_offset: FixedOffset,
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn synthesizer(&self) -> ReportSynthesizer {
        ReportSynthesizer::new(
            self.store.clone(),
            self.generator.clone(),
            self.events.clone(),
            self.config.locale.clone(),
            self.tz_offset,
        )
    }
}
