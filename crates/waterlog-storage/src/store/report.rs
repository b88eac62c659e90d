use anyhow::Result;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder};
use waterlog_common::types::{AIReportRow, CreateAIReportRequest};

use crate::entities::ai_report::{self, Column as RepCol, Entity as RepEntity};
use crate::store::WaterStore;

fn model_to_report(m: ai_report::Model) -> Result<AIReportRow> {
    Ok(AIReportRow {
        id: m.id,
        account_id: m.account_id,
        content: m.content,
        start_date: m.start_date.with_timezone(&Utc),
        end_date: m.end_date.with_timezone(&Utc),
        report_type: m.report_type.parse().map_err(anyhow::Error::msg)?,
        created_at: m.created_at.with_timezone(&Utc),
    })
}

impl WaterStore {
    pub async fn insert_ai_report(&self, report: &CreateAIReportRequest) -> Result<AIReportRow> {
        let now = Utc::now().fixed_offset();
        let am = ai_report::ActiveModel {
            id: Set(waterlog_common::id::next_id()),
            account_id: Set(report.account_id.clone()),
            content: Set(report.content.clone()),
            start_date: Set(report.start_date.fixed_offset()),
            end_date: Set(report.end_date.fixed_offset()),
            report_type: Set(report.report_type.to_string()),
            created_at: Set(now),
        };
        let m = am.insert(self.db()).await?;
        model_to_report(m)
    }

    /// All reports for the account, newest first.
    pub async fn list_ai_reports(&self, account_id: &str) -> Result<Vec<AIReportRow>> {
        let rows = RepEntity::find()
            .filter(RepCol::AccountId.eq(account_id))
            .order_by(RepCol::CreatedAt, Order::Desc)
            .all(self.db())
            .await?;
        rows.into_iter().map(model_to_report).collect()
    }

    pub async fn get_ai_report_by_id(
        &self,
        account_id: &str,
        id: &str,
    ) -> Result<Option<AIReportRow>> {
        let m = RepEntity::find()
            .filter(RepCol::Id.eq(id))
            .filter(RepCol::AccountId.eq(account_id))
            .one(self.db())
            .await?;
        m.map(model_to_report).transpose()
    }
}
