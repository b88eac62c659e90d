use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder};
use waterlog_common::types::IntakeLogRow;

use crate::entities::intake_log::{self, Column as IntakeCol, Entity as IntakeEntity};
use crate::store::WaterStore;

fn model_to_intake(m: intake_log::Model) -> Result<IntakeLogRow> {
    Ok(IntakeLogRow {
        id: m.id,
        account_id: m.account_id,
        level: m.level.parse().map_err(anyhow::Error::msg)?,
        recorded_at: m.recorded_at.with_timezone(&Utc),
        created_at: m.created_at.with_timezone(&Utc),
    })
}

impl WaterStore {
    pub async fn insert_intake_log(
        &self,
        account_id: &str,
        level: waterlog_common::types::IntakeLevel,
        recorded_at: DateTime<Utc>,
    ) -> Result<IntakeLogRow> {
        let now = Utc::now().fixed_offset();
        let am = intake_log::ActiveModel {
            id: Set(waterlog_common::id::next_id()),
            account_id: Set(account_id.to_string()),
            level: Set(level.to_string()),
            recorded_at: Set(recorded_at.fixed_offset()),
            created_at: Set(now),
        };
        let m = am.insert(self.db()).await?;
        model_to_intake(m)
    }

    /// Intake logs with `recorded_at` in `[from, to]` inclusive, newest first.
    pub async fn list_intake_by_range(
        &self,
        account_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<IntakeLogRow>> {
        let rows = IntakeEntity::find()
            .filter(IntakeCol::AccountId.eq(account_id))
            .filter(IntakeCol::RecordedAt.gte(from.fixed_offset()))
            .filter(IntakeCol::RecordedAt.lte(to.fixed_offset()))
            .order_by(IntakeCol::RecordedAt, Order::Desc)
            .all(self.db())
            .await?;
        rows.into_iter().map(model_to_intake).collect()
    }

    /// Delete one intake log, scoped to the owning account. Returns `false`
    /// when no row matched; a mismatched account deletes nothing.
    pub async fn delete_intake_log(&self, account_id: &str, id: &str) -> Result<bool> {
        let res = IntakeEntity::delete_many()
            .filter(IntakeCol::Id.eq(id))
            .filter(IntakeCol::AccountId.eq(account_id))
            .exec(self.db())
            .await?;
        Ok(res.rows_affected > 0)
    }
}
