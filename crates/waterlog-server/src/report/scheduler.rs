use crate::report::{ReportSynthesizer, SynthesisError};
use crate::time::today_local;
use anyhow::Result;
use chrono::{Duration as ChronoDuration, FixedOffset, NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use waterlog_common::types::ReportType;
use waterlog_storage::WaterStore;

/// Background generator of one weekly coaching report.
///
/// Each tick checks whether a weekly report was created within the last
/// seven days and, if not, synthesizes one over the seven days ending
/// yesterday. Windows without any logs are skipped quietly.
pub struct WeeklyReportScheduler {
    store: Arc<WaterStore>,
    synthesizer: ReportSynthesizer,
    account_id: String,
    tz_offset: FixedOffset,
    tick_interval: Duration,
}

impl WeeklyReportScheduler {
    pub fn new(
        store: Arc<WaterStore>,
        synthesizer: ReportSynthesizer,
        account_id: String,
        tz_offset: FixedOffset,
        tick_interval: Duration,
    ) -> Self {
        Self {
            store,
            synthesizer,
            account_id,
            tz_offset,
            tick_interval,
        }
    }

    pub async fn start(self: Arc<Self>) {
        let mut ticker = time::interval(self.tick_interval);

        loop {
            ticker.tick().await;

            if let Err(e) = self.tick().await {
                tracing::error!(error = %e, "Weekly report scheduler tick failed");
            }
        }
    }

    async fn tick(&self) -> Result<()> {
        if !self.is_due().await? {
            return Ok(());
        }

        let today = today_local(self.tz_offset);
        let (start, end) = trailing_week(today);

        tracing::info!(
            account_id = %self.account_id,
            start = %start,
            end = %end,
            "Weekly report is due"
        );

        match self
            .synthesizer
            .synthesize(&self.account_id, start, end, Some(ReportType::Weekly))
            .await
        {
            Ok(report) => {
                tracing::info!(report_id = %report.id, "Weekly report generated");
                Ok(())
            }
            Err(SynthesisError::InsufficientData) => {
                tracing::debug!(
                    start = %start,
                    end = %end,
                    "No logs in the weekly window, skipping"
                );
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Due when no weekly report exists, or the latest one is older than
    /// seven days.
    async fn is_due(&self) -> Result<bool> {
        let reports = self.store.list_ai_reports(&self.account_id).await?;
        let latest_weekly = reports
            .into_iter()
            .find(|r| r.report_type == ReportType::Weekly);

        let Some(latest) = latest_weekly else {
            return Ok(true);
        };

        Ok(Utc::now() - latest.created_at >= ChronoDuration::days(7))
    }
}

/// Seven full days ending yesterday, relative to `today`.
fn trailing_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let end = today - ChronoDuration::days(1);
    let start = end - ChronoDuration::days(6);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_week_ends_yesterday() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let (start, end) = trailing_week(today);
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 3, 9).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
        assert_eq!((end - start).num_days(), 6);
    }
}
