use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::audit::entity::audit_log;
use crate::domain::dream::dto::InterpretationSummary;
use crate::domain::user::entity::user::{self, Lifecycle, UserRole};

use super::entity::system_setting;

/// Console landing data: headline totals plus the three analytics views.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub total_users: u64,
    pub active_dreams: u64,
    pub daily_dreams: Vec<DailyDreams>,
    pub sentiment_stats: Vec<SentimentStat>,
    pub top_tags: Vec<TopTag>,
}

/// Row of the `admin_daily_dreams` view.
#[derive(Debug, Serialize, FromQueryResult, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyDreams {
    pub day: NaiveDate,
    pub dream_count: i64,
}

/// Row of the `admin_sentiment_stats` view.
#[derive(Debug, Serialize, FromQueryResult, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SentimentStat {
    pub day: NaiveDate,
    pub avg_stress: f64,
    pub avg_anxiety: f64,
    pub avg_happiness: f64,
}

/// Row of the `admin_top_tags` view.
#[derive(Debug, Serialize, FromQueryResult, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopTag {
    pub tag: String,
    pub usage_count: i64,
}

/// One dream in the moderation listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDreamItem {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    pub dream_text: String,
    pub tags: Vec<String>,
    pub lifecycle: Lifecycle,
    pub created_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<InterpretationSummary>,
}

/// One user in the account listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserItem {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub lifecycle: Lifecycle,
    pub created_at: NaiveDateTime,
}

impl From<user::Model> for AdminUserItem {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email.clone(),
            role: model.role,
            lifecycle: model.lifecycle(),
            created_at: model.created_at,
        }
    }
}

/// One audit trail entry.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogItem {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    pub action: String,
    pub details: serde_json::Value,
    pub created_at: NaiveDateTime,
}

impl From<audit_log::Model> for AuditLogItem {
    fn from(model: audit_log::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            action: model.action,
            details: model.details,
            created_at: model.created_at,
        }
    }
}

/// One boolean feature switch.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingItem {
    pub key: String,
    pub value: bool,
    pub description: String,
}

impl From<system_setting::Model> for SettingItem {
    fn from(model: system_setting::Model) -> Self {
        Self {
            key: model.key,
            value: model.value,
            description: model.description,
        }
    }
}

/// Explicit target value for a setting, so the operation is idempotent.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingRequest {
    pub value: bool,
}

/// Manual analysis override.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditInterpretationRequest {
    #[validate(length(min = 1, max = 8000, message = "คำทำนายต้องมีความยาว 1 ถึง 8000 ตัวอักษร"))]
    pub analysis: String,
}

/// Query parameters for the admin listings.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AdminSearchQuery {
    pub search: Option<String>,
}

/// Row shape behind the CSV export (daily dream volume with averaged
/// sentiment scores).
#[derive(Debug, FromQueryResult)]
pub struct DailyReportRow {
    pub day: NaiveDate,
    pub dream_count: i64,
    pub avg_stress: Option<f64>,
    pub avg_anxiety: Option<f64>,
    pub avg_happiness: Option<f64>,
}
