use crate::events::{emit, EventSender, StoreEvent};
use crate::time::local_day_range;
use chrono::{FixedOffset, NaiveDate};
use std::sync::Arc;
use waterlog_ai::{build_report_prompt, AiError, ConditionEntry, IntakeEntry, ReportInput, TextGenerator};
use waterlog_common::types::{AIReportRow, CreateAIReportRequest, ReportType};
use waterlog_storage::WaterStore;

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("no intake or condition data in the requested window")]
    InsufficientData,
    #[error("failed to load logs: {0}")]
    DataRetrieval(#[source] anyhow::Error),
    #[error(transparent)]
    Generation(#[from] AiError),
    #[error("failed to persist report: {0}")]
    Persistence(#[source] anyhow::Error),
}

/// Turns a window of intake and condition logs into one persisted AI report.
///
/// The pipeline is strictly ordered: load logs, refuse empty windows, build
/// the prompt, call the text provider exactly once, persist, notify. Nothing
/// is written unless the provider call succeeded.
pub struct ReportSynthesizer {
    store: Arc<WaterStore>,
    generator: Arc<dyn TextGenerator>,
    events: EventSender,
    locale: String,
    tz_offset: FixedOffset,
}

impl ReportSynthesizer {
    pub fn new(
        store: Arc<WaterStore>,
        generator: Arc<dyn TextGenerator>,
        events: EventSender,
        locale: String,
        tz_offset: FixedOffset,
    ) -> Self {
        Self {
            store,
            generator,
            events,
            locale,
            tz_offset,
        }
    }

    pub async fn synthesize(
        &self,
        account_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        report_type: Option<ReportType>,
    ) -> Result<AIReportRow, SynthesisError> {
        let (window_start, _) = local_day_range(start_date, self.tz_offset);
        let (_, window_end) = local_day_range(end_date, self.tz_offset);

        let mut intake = self
            .store
            .list_intake_by_range(account_id, window_start, window_end)
            .await
            .map_err(SynthesisError::DataRetrieval)?;
        let mut conditions = self
            .store
            .list_conditions_by_range(account_id, start_date, end_date)
            .await
            .map_err(SynthesisError::DataRetrieval)?;

        if intake.is_empty() && conditions.is_empty() {
            return Err(SynthesisError::InsufficientData);
        }

        // stores return newest-first; the coach reads chronologically
        intake.reverse();
        conditions.reverse();

        let input = ReportInput {
            start_date,
            end_date,
            locale: self.locale.clone(),
            intake: intake
                .iter()
                .map(|row| IntakeEntry {
                    time: row
                        .recorded_at
                        .with_timezone(&self.tz_offset)
                        .to_rfc3339(),
                    level: row.level.to_string(),
                })
                .collect(),
            conditions: conditions
                .iter()
                .map(|row| ConditionEntry {
                    date: row.log_date.format("%Y-%m-%d").to_string(),
                    condition: row.condition_type.to_string(),
                    note: row.note.clone(),
                })
                .collect(),
        };

        let prompt = build_report_prompt(&input)?;

        tracing::info!(
            account_id = %account_id,
            start = %start_date,
            end = %end_date,
            intake_count = input.intake.len(),
            condition_count = input.conditions.len(),
            provider = self.generator.provider(),
            model = self.generator.model_name(),
            "Synthesizing report"
        );

        let content = self.generator.complete(&prompt).await?;

        let report = self
            .store
            .insert_ai_report(&CreateAIReportRequest {
                account_id: account_id.to_string(),
                content,
                start_date: window_start,
                end_date: window_end,
                report_type: report_type.unwrap_or(ReportType::Manual),
            })
            .await
            .map_err(SynthesisError::Persistence)?;

        emit(
            &self.events,
            StoreEvent::ReportCreated {
                report_id: report.id.clone(),
            },
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use waterlog_ai::Result as AiResult;
    use waterlog_common::types::{ConditionType, IntakeLevel};

    struct MockGenerator {
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
        fail_with_config_error: bool,
    }

    impl MockGenerator {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
                fail_with_config_error: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail_with_config_error: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl TextGenerator for MockGenerator {
        fn provider(&self) -> &str {
            "mock"
        }

        fn model_name(&self) -> &str {
            "mock-model"
        }

        async fn complete(&self, prompt: &str) -> AiResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            if self.fail_with_config_error {
                return Err(AiError::Configuration("no key".to_string()));
            }
            Ok("drink steadily, you are doing well".to_string())
        }
    }

    async fn harness(
        generator: Arc<MockGenerator>,
    ) -> (Arc<WaterStore>, ReportSynthesizer) {
        waterlog_common::id::init(1, 1);
        let store = Arc::new(WaterStore::new("sqlite::memory:").await.unwrap());
        let (events, _rx) = crate::events::channel();
        let synthesizer = ReportSynthesizer::new(
            store.clone(),
            generator,
            events,
            "en".to_string(),
            FixedOffset::east_opt(9 * 3600).unwrap(),
        );
        (store, synthesizer)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn empty_window_never_calls_the_provider() {
        let generator = Arc::new(MockGenerator::new());
        let (_store, synthesizer) = harness(generator.clone()).await;

        let err = synthesizer
            .synthesize("acc-1", day(2026, 3, 1), day(2026, 3, 7), None)
            .await
            .unwrap_err();

        assert!(matches!(err, SynthesisError::InsufficientData));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn synthesis_calls_provider_once_and_persists() {
        let generator = Arc::new(MockGenerator::new());
        let (store, synthesizer) = harness(generator.clone()).await;

        for hour in [8, 11, 15, 20] {
            store
                .insert_intake_log(
                    "acc-1",
                    IntakeLevel::Medium,
                    Utc.with_ymd_and_hms(2026, 3, 2, hour, 0, 0).unwrap(),
                )
                .await
                .unwrap();
        }
        store
            .upsert_condition_log("acc-1", day(2026, 3, 2), ConditionType::Good, None)
            .await
            .unwrap();
        store
            .upsert_condition_log(
                "acc-1",
                day(2026, 3, 3),
                ConditionType::Fatigue,
                Some("slept badly"),
            )
            .await
            .unwrap();

        let report = synthesizer
            .synthesize("acc-1", day(2026, 3, 1), day(2026, 3, 7), None)
            .await
            .unwrap();

        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.report_type, ReportType::Manual);
        assert_eq!(report.content, "drink steadily, you are doing well");

        let prompt = generator.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("(4 entries)"));
        assert!(prompt.contains("(2 entries)"));
        assert!(prompt.contains("slept badly"));

        let listed = store.list_ai_reports("acc-1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, report.id);
    }

    #[tokio::test]
    async fn provider_failure_persists_nothing() {
        let generator = Arc::new(MockGenerator::failing());
        let (store, synthesizer) = harness(generator.clone()).await;

        store
            .insert_intake_log(
                "acc-1",
                IntakeLevel::High,
                Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
            )
            .await
            .unwrap();

        let err = synthesizer
            .synthesize("acc-1", day(2026, 3, 1), day(2026, 3, 7), None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SynthesisError::Generation(AiError::Configuration(_))
        ));
        assert!(store.list_ai_reports("acc-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn requested_report_type_is_preserved() {
        let generator = Arc::new(MockGenerator::new());
        let (store, synthesizer) = harness(generator.clone()).await;

        store
            .upsert_condition_log("acc-1", day(2026, 3, 4), ConditionType::Swelling, None)
            .await
            .unwrap();

        let report = synthesizer
            .synthesize(
                "acc-1",
                day(2026, 3, 1),
                day(2026, 3, 7),
                Some(ReportType::Weekly),
            )
            .await
            .unwrap();

        assert_eq!(report.report_type, ReportType::Weekly);
        let got = store
            .get_ai_report_by_id("acc-1", &report.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got.report_type, ReportType::Weekly);
    }
}
