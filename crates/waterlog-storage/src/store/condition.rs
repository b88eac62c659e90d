use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveValue::Set, ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder};
use waterlog_common::types::{ConditionLogRow, ConditionType};

use crate::entities::condition_log::{self, Column as CondCol, Entity as CondEntity};
use crate::store::WaterStore;

fn model_to_condition(m: condition_log::Model) -> Result<ConditionLogRow> {
    Ok(ConditionLogRow {
        id: m.id,
        account_id: m.account_id,
        condition_type: m.condition_type.parse().map_err(anyhow::Error::msg)?,
        note: m.note,
        log_date: m.log_date,
        created_at: m.created_at.with_timezone(&Utc),
    })
}

impl WaterStore {
    /// Insert or replace the condition entry for `(account_id, log_date)`.
    ///
    /// The conflict resolution is atomic at the database level: two racing
    /// upserts for the same account and day leave exactly one row, with the
    /// later write's `condition_type`, `note`, and `created_at` winning.
    pub async fn upsert_condition_log(
        &self,
        account_id: &str,
        log_date: NaiveDate,
        condition_type: ConditionType,
        note: Option<&str>,
    ) -> Result<ConditionLogRow> {
        use sea_orm::sea_query::OnConflict;
        let now = Utc::now().fixed_offset();
        let am = condition_log::ActiveModel {
            id: Set(waterlog_common::id::next_id()),
            account_id: Set(account_id.to_string()),
            condition_type: Set(condition_type.to_string()),
            note: Set(note.map(str::to_string)),
            log_date: Set(log_date),
            created_at: Set(now),
        };
        CondEntity::insert(am)
            .on_conflict(
                OnConflict::columns([CondCol::AccountId, CondCol::LogDate])
                    .update_columns([CondCol::ConditionType, CondCol::Note, CondCol::CreatedAt])
                    .to_owned(),
            )
            .exec_without_returning(self.db())
            .await?;

        self.get_condition_by_date(account_id, log_date)
            .await?
            .ok_or_else(|| anyhow!("condition log missing after upsert"))
    }

    /// The single condition entry for that day, if any. Absence is not an
    /// error here; callers decide what an empty day means.
    pub async fn get_condition_by_date(
        &self,
        account_id: &str,
        log_date: NaiveDate,
    ) -> Result<Option<ConditionLogRow>> {
        let m = CondEntity::find()
            .filter(CondCol::AccountId.eq(account_id))
            .filter(CondCol::LogDate.eq(log_date))
            .one(self.db())
            .await?;
        m.map(model_to_condition).transpose()
    }

    /// Condition entries with `log_date` in `[start, end]` inclusive, newest
    /// day first.
    pub async fn list_conditions_by_range(
        &self,
        account_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ConditionLogRow>> {
        let rows = CondEntity::find()
            .filter(CondCol::AccountId.eq(account_id))
            .filter(CondCol::LogDate.gte(start))
            .filter(CondCol::LogDate.lte(end))
            .order_by(CondCol::LogDate, Order::Desc)
            .all(self.db())
            .await?;
        rows.into_iter().map(model_to_condition).collect()
    }
}
