use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement,
};
use serde_json::json;
use uuid::Uuid;

use crate::domain::audit::entity::audit_log;
use crate::domain::audit::{actions, AuditService};
use crate::domain::dream::dto::InterpretationSummary;
use crate::domain::dream::entity::{dream, interpretation};
use crate::domain::user::entity::user::{self, Lifecycle};
use crate::utils::error::AppError;

use super::dto::{
    AdminDreamItem, AdminUserItem, AuditLogItem, DailyDreams, DailyReportRow, OverviewResponse,
    SentimentStat, SettingItem, TopTag,
};
use super::entity::system_setting;

/// Row cap for the console listings.
const LIST_LIMIT: u64 = 50;

pub struct AdminService;

impl AdminService {
    /// Resolves the caller against the database and requires the admin
    /// role. Capability lives in `users.role`, never in the token.
    pub async fn require_admin(
        db: &DatabaseConnection,
        user_id: Uuid,
    ) -> Result<user::Model, AppError> {
        let caller = user::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::forbidden("ต้องเป็นผู้ดูแลระบบเท่านั้น"))?;

        if caller.lifecycle() == Lifecycle::Deleted || !caller.is_admin() {
            return Err(AppError::forbidden("ต้องเป็นผู้ดูแลระบบเท่านั้น"));
        }
        Ok(caller)
    }

    /// Console landing data: totals plus the three analytics views.
    pub async fn overview(db: &DatabaseConnection) -> Result<OverviewResponse, AppError> {
        let total_users = user::Entity::find().count(db).await?;
        let active_dreams = dream::Entity::find()
            .filter(dream::Column::DeletedAt.is_null())
            .count(db)
            .await?;

        let daily_dreams = DailyDreams::find_by_statement(Statement::from_string(
            DbBackend::Postgres,
            "SELECT day, dream_count FROM admin_daily_dreams ORDER BY day DESC LIMIT 30",
        ))
        .all(db)
        .await?;

        let sentiment_stats = SentimentStat::find_by_statement(Statement::from_string(
            DbBackend::Postgres,
            "SELECT day, avg_stress, avg_anxiety, avg_happiness \
             FROM admin_sentiment_stats ORDER BY day DESC LIMIT 30",
        ))
        .all(db)
        .await?;

        let top_tags = TopTag::find_by_statement(Statement::from_string(
            DbBackend::Postgres,
            "SELECT tag, usage_count FROM admin_top_tags ORDER BY usage_count DESC LIMIT 20",
        ))
        .all(db)
        .await?;

        Ok(OverviewResponse {
            total_users,
            active_dreams,
            daily_dreams,
            sentiment_stats,
            top_tags,
        })
    }

    /// Latest active dreams with owner email and interpretation.
    pub async fn list_dreams(
        db: &DatabaseConnection,
        search: Option<&str>,
    ) -> Result<Vec<AdminDreamItem>, AppError> {
        let mut query = dream::Entity::find()
            .filter(dream::Column::DeletedAt.is_null())
            .order_by_desc(dream::Column::CreatedAt)
            .limit(LIST_LIMIT);
        if let Some(term) = search.filter(|t| !t.is_empty()) {
            query = query.filter(dream::Column::DreamText.contains(term));
        }
        let rows = query.find_also_related(interpretation::Entity).all(db).await?;

        let owner_ids: Vec<Uuid> = rows.iter().filter_map(|(d, _)| d.user_id).collect();
        let emails: HashMap<Uuid, String> = user::Entity::find()
            .filter(user::Column::Id.is_in(owner_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.email))
            .collect();

        Ok(rows
            .into_iter()
            .map(|(d, i)| AdminDreamItem {
                id: d.id,
                user_email: d.user_id.and_then(|id| emails.get(&id).cloned()),
                lifecycle: d.lifecycle(),
                dream_text: d.dream_text,
                tags: d.tags,
                created_at: d.created_at,
                interpretation: i.map(|i| InterpretationSummary {
                    analysis: i.analysis_text,
                    lucky_numbers: i.lucky_numbers,
                    stress_score: i.stress_score,
                    anxiety_score: i.anxiety_score,
                    happiness_score: i.happiness_score,
                    rating: i.rating,
                }),
            })
            .collect())
    }

    /// Latest registered users, active and banned alike.
    pub async fn list_users(
        db: &DatabaseConnection,
        search: Option<&str>,
    ) -> Result<Vec<AdminUserItem>, AppError> {
        let mut query = user::Entity::find()
            .order_by_desc(user::Column::CreatedAt)
            .limit(LIST_LIMIT);
        if let Some(term) = search.filter(|t| !t.is_empty()) {
            query = query.filter(user::Column::Email.contains(term));
        }
        let rows = query.all(db).await?;
        Ok(rows.into_iter().map(AdminUserItem::from).collect())
    }

    /// Latest audit trail entries.
    pub async fn list_logs(db: &DatabaseConnection) -> Result<Vec<AuditLogItem>, AppError> {
        let rows = audit_log::Entity::find()
            .order_by_desc(audit_log::Column::CreatedAt)
            .limit(LIST_LIMIT)
            .all(db)
            .await?;
        Ok(rows.into_iter().map(AuditLogItem::from).collect())
    }

    pub async fn list_settings(db: &DatabaseConnection) -> Result<Vec<SettingItem>, AppError> {
        let rows = system_setting::Entity::find()
            .order_by_asc(system_setting::Column::Key)
            .all(db)
            .await?;
        Ok(rows.into_iter().map(SettingItem::from).collect())
    }

    /// Sets a boolean feature switch to an explicit value.
    pub async fn update_setting(
        db: &DatabaseConnection,
        admin_id: Uuid,
        key: &str,
        value: bool,
    ) -> Result<SettingItem, AppError> {
        let found = system_setting::Entity::find_by_id(key)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("ไม่พบการตั้งค่านี้"))?;

        let mut active: system_setting::ActiveModel = found.into();
        active.value = Set(value);
        let updated = active.update(db).await?;

        AuditService::record(
            db,
            Some(admin_id),
            actions::ADMIN_TOGGLE_SETTING,
            json!({ "key": key, "value": value }),
        )
        .await;

        Ok(SettingItem::from(updated))
    }

    /// Soft-deletes a user account. Admin accounts cannot be banned.
    pub async fn ban_user(
        db: &DatabaseConnection,
        admin_id: Uuid,
        target_id: Uuid,
    ) -> Result<(), AppError> {
        let target = user::Entity::find_by_id(target_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("ไม่พบบัญชีผู้ใช้"))?;

        if target.is_admin() {
            return Err(AppError::forbidden("ไม่สามารถระงับบัญชีผู้ดูแลระบบได้"));
        }
        if target.lifecycle() == Lifecycle::Deleted {
            return Err(AppError::InvalidInput("บัญชีนี้ถูกระงับอยู่แล้ว".to_string()));
        }

        let mut active: user::ActiveModel = target.into();
        active.deleted_at = Set(Some(Utc::now().naive_utc()));
        active.update(db).await?;

        AuditService::record(
            db,
            Some(admin_id),
            actions::ADMIN_BAN_USER,
            json!({ "target_user_id": target_id }),
        )
        .await;

        Ok(())
    }

    /// Reverses a ban, returning the account to the active state.
    pub async fn restore_user(
        db: &DatabaseConnection,
        admin_id: Uuid,
        target_id: Uuid,
    ) -> Result<(), AppError> {
        let target = user::Entity::find_by_id(target_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("ไม่พบบัญชีผู้ใช้"))?;

        if target.lifecycle() == Lifecycle::Active {
            return Err(AppError::InvalidInput("บัญชีนี้ใช้งานได้อยู่แล้ว".to_string()));
        }

        let mut active: user::ActiveModel = target.into();
        active.deleted_at = Set(None);
        active.update(db).await?;

        AuditService::record(
            db,
            Some(admin_id),
            actions::ADMIN_RESTORE_USER,
            json!({ "target_user_id": target_id }),
        )
        .await;

        Ok(())
    }

    /// Admin soft delete of any dream, regardless of owner.
    pub async fn delete_dream(
        db: &DatabaseConnection,
        admin_id: Uuid,
        dream_id: Uuid,
    ) -> Result<(), AppError> {
        let found = dream::Entity::find_by_id(dream_id)
            .filter(dream::Column::DeletedAt.is_null())
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("ไม่พบความฝันนี้"))?;

        let mut active: dream::ActiveModel = found.into();
        active.deleted_at = Set(Some(Utc::now().naive_utc()));
        active.update(db).await?;

        AuditService::record(
            db,
            Some(admin_id),
            actions::ADMIN_DELETE_DREAM,
            json!({ "dream_id": dream_id }),
        )
        .await;

        Ok(())
    }

    pub async fn restore_dream(
        db: &DatabaseConnection,
        admin_id: Uuid,
        dream_id: Uuid,
    ) -> Result<(), AppError> {
        let found = dream::Entity::find_by_id(dream_id)
            .filter(dream::Column::DeletedAt.is_not_null())
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("ไม่พบความฝันที่ถูกลบนี้"))?;

        let mut active: dream::ActiveModel = found.into();
        active.deleted_at = Set(None);
        active.update(db).await?;

        AuditService::record(
            db,
            Some(admin_id),
            actions::ADMIN_RESTORE_DREAM,
            json!({ "dream_id": dream_id }),
        )
        .await;

        Ok(())
    }

    /// Manual analysis override, stamped with a researcher note.
    pub async fn edit_interpretation(
        db: &DatabaseConnection,
        admin_id: Uuid,
        interpretation_id: Uuid,
        analysis: String,
    ) -> Result<(), AppError> {
        let found = interpretation::Entity::find_by_id(interpretation_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("ไม่พบคำทำนายนี้"))?;

        let now = Utc::now();
        let mut active: interpretation::ActiveModel = found.into();
        active.analysis_text = Set(analysis);
        active.researcher_note = Set(Some(format!(
            "Edited by Admin on {}",
            now.format("%Y-%m-%d")
        )));
        active.updated_at = Set(now.naive_utc());
        active.update(db).await?;

        AuditService::record(
            db,
            Some(admin_id),
            actions::ADMIN_EDIT_INTERPRETATION,
            json!({ "interpretation_id": interpretation_id }),
        )
        .await;

        Ok(())
    }

    /// Daily-activity report as CSV text: dream volume joined with the
    /// averaged sentiment scores per day.
    pub async fn export_report(
        db: &DatabaseConnection,
        admin_id: Uuid,
    ) -> Result<String, AppError> {
        let rows = DailyReportRow::find_by_statement(Statement::from_string(
            DbBackend::Postgres,
            "SELECT d.day, d.dream_count, s.avg_stress, s.avg_anxiety, s.avg_happiness \
             FROM admin_daily_dreams d \
             LEFT JOIN admin_sentiment_stats s ON s.day = d.day \
             ORDER BY d.day DESC",
        ))
        .all(db)
        .await?;

        let mut csv = String::from("date,dream_count,avg_stress,avg_anxiety,avg_happiness\n");
        for row in &rows {
            csv.push_str(&format!(
                "{},{},{},{},{}\n",
                row.day,
                row.dream_count,
                format_avg(row.avg_stress),
                format_avg(row.avg_anxiety),
                format_avg(row.avg_happiness),
            ));
        }

        AuditService::record(
            db,
            Some(admin_id),
            actions::ADMIN_EXPORT_REPORT,
            json!({ "rows": rows.len() }),
        )
        .await;

        Ok(csv)
    }
}

fn format_avg(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use crate::domain::user::entity::user::{Gender, UserRole};

    use super::*;

    fn user_row(role: UserRole, deleted: bool) -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            email: "somebody@example.com".to_string(),
            role,
            birth_date: None,
            gender: Some(Gender::PreferNotToSay),
            location: None,
            created_at: Utc::now().naive_utc(),
            deleted_at: deleted.then(|| Utc::now().naive_utc()),
        }
    }

    #[tokio::test]
    async fn non_admin_caller_is_forbidden() {
        // Arrange
        let caller = user_row(UserRole::User, false);
        let caller_id = caller.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![caller]])
            .into_connection();

        // Act
        let result = AdminService::require_admin(&db, caller_id).await;

        // Assert
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn banned_admin_is_forbidden() {
        // Arrange
        let caller = user_row(UserRole::Admin, true);
        let caller_id = caller.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![caller]])
            .into_connection();

        // Act
        let result = AdminService::require_admin(&db, caller_id).await;

        // Assert
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn active_admin_passes_the_guard() {
        // Arrange
        let caller = user_row(UserRole::Admin, false);
        let caller_id = caller.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![caller]])
            .into_connection();

        // Act
        let result = AdminService::require_admin(&db, caller_id).await;

        // Assert
        assert!(result.is_ok());
        assert!(result.unwrap().is_admin());
    }

    #[tokio::test]
    async fn banning_a_user_sets_the_deletion_timestamp() {
        // Arrange
        let target = user_row(UserRole::User, false);
        let target_id = target.id;
        let mut banned = target.clone();
        banned.deleted_at = Some(Utc::now().naive_utc());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![target]])
            // UPDATE ... RETURNING
            .append_query_results([vec![banned]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        // Act
        let result = AdminService::ban_user(&db, Uuid::new_v4(), target_id).await;

        // Assert
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn admins_cannot_be_banned() {
        // Arrange
        let target = user_row(UserRole::Admin, false);
        let target_id = target.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![target]])
            .into_connection();

        // Act
        let result = AdminService::ban_user(&db, Uuid::new_v4(), target_id).await;

        // Assert
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn banning_twice_is_rejected() {
        // Arrange
        let target = user_row(UserRole::User, true);
        let target_id = target.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![target]])
            .into_connection();

        // Act
        let result = AdminService::ban_user(&db, Uuid::new_v4(), target_id).await;

        // Assert
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn restore_reverses_a_ban() {
        // Arrange
        let target = user_row(UserRole::User, true);
        let target_id = target.id;
        let mut restored = target.clone();
        restored.deleted_at = None;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![target]])
            .append_query_results([vec![restored]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        // Act
        let result = AdminService::restore_user(&db, Uuid::new_v4(), target_id).await;

        // Assert
        assert!(result.is_ok());
    }

    #[test]
    fn csv_averages_render_at_two_decimals() {
        assert_eq!(format_avg(Some(3.14159)), "3.14");
        assert_eq!(format_avg(None), "");
    }
}
