use chrono::Utc;
use sea_orm::{ConnectionTrait, EntityTrait, Set};
use tracing::warn;
use uuid::Uuid;

use super::entity::audit_log;

/// Audit action tags.
pub mod actions {
    pub const INTERPRET_DREAM: &str = "INTERPRET_DREAM";
    pub const DELETE_DREAM: &str = "DELETE_DREAM";
    pub const RATE_INTERPRETATION: &str = "RATE_INTERPRETATION";
    pub const ADMIN_BAN_USER: &str = "ADMIN_BAN_USER";
    pub const ADMIN_RESTORE_USER: &str = "ADMIN_RESTORE_USER";
    pub const ADMIN_DELETE_DREAM: &str = "ADMIN_DELETE_DREAM";
    pub const ADMIN_RESTORE_DREAM: &str = "ADMIN_RESTORE_DREAM";
    pub const ADMIN_EDIT_INTERPRETATION: &str = "ADMIN_EDIT_INTERPRETATION";
    pub const ADMIN_TOGGLE_SETTING: &str = "ADMIN_TOGGLE_SETTING";
    pub const ADMIN_EXPORT_REPORT: &str = "ADMIN_EXPORT_REPORT";
}

pub struct AuditService;

impl AuditService {
    /// Appends an audit entry.
    ///
    /// The trail is best-effort: a failed append is logged and swallowed so
    /// it never aborts the request that triggered it.
    pub async fn record<C>(db: &C, user_id: Option<Uuid>, action: &str, details: serde_json::Value)
    where
        C: ConnectionTrait,
    {
        let entry = audit_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            action: Set(action.to_string()),
            details: Set(details),
            created_at: Set(Utc::now().naive_utc()),
        };

        if let Err(e) = audit_log::Entity::insert(entry)
            .exec_without_returning(db)
            .await
        {
            warn!(action, "Failed to append audit log entry: {}", e);
        }
    }
}
