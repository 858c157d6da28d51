use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, Set, Statement,
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::audit::{actions, AuditService};
use crate::state::AppState;
use crate::utils::error::AppError;

use super::dto::{DreamHistoryItem, GenerationOutcome, InterpretationResult};
use super::entity::{dream, interpretation, symbol_dictionary};
use super::language::{self, AnalysisMode};
use super::prompt::InterpretPrompt;
use crate::domain::user::entity::user_usage;

/// Interpretations allowed per user per calendar day.
pub const DAILY_QUOTA: i32 = 5;

/// Above this similarity a prior dream is treated as the same dream and its
/// stored interpretation is returned instead of generating a new one.
const EXACT_MATCH_SIMILARITY: f64 = 0.96;

/// How many similar past dreams feed the prompt context.
const MATCH_COUNT: i64 = 3;

/// Row shape returned by the `match_dreams` stored procedure.
#[derive(Debug, FromQueryResult)]
pub struct SimilarDream {
    pub id: Uuid,
    pub dream_text: String,
    pub similarity: f64,
}

pub struct DreamService;

impl DreamService {
    /// Runs the full interpretation pipeline for one dream submission.
    ///
    /// Anonymous callers get an interpretation but nothing is persisted and
    /// no quota applies. Authenticated callers are quota-checked up front
    /// and their dream, interpretation, usage and audit rows are written
    /// after a successful generation.
    pub async fn interpret(
        state: &AppState,
        caller: Option<Uuid>,
        dream_text: &str,
    ) -> Result<InterpretationResult, AppError> {
        if dream_text.trim().is_empty() {
            return Err(AppError::InvalidInput("กรุณาระบุความฝัน".to_string()));
        }
        if !language::contains_thai(dream_text) {
            return Err(AppError::UnsupportedLanguage(
                "ระบบรองรับเฉพาะภาษาไทยครับ".to_string(),
            ));
        }

        let mode = AnalysisMode::classify(dream_text);
        let today = Utc::now().date_naive();

        // Quota is checked before any generation cost is incurred. The
        // check is advisory; the conditional upsert below is what actually
        // enforces the cap under concurrency.
        if let Some(user_id) = caller {
            let used = Self::usage_today(&*state.db, user_id, today).await?;
            if used >= DAILY_QUOTA {
                return Err(AppError::QuotaExceeded(format!(
                    "โควต้าวันนี้เต็มแล้ว ({}/{})",
                    DAILY_QUOTA, DAILY_QUOTA
                )));
            }
        }

        info!(
            mode = mode.as_str(),
            authenticated = caller.is_some(),
            "Interpreting dream"
        );

        let embedding = state.ai.embed(dream_text).await?;
        let similar =
            Self::find_similar_dreams(&*state.db, &embedding, mode.match_threshold(), caller)
                .await?;

        // Semantic cache: a near-identical prior dream answers immediately.
        // The hit still consumes quota but writes no new rows.
        if let Some(hit) = similar.iter().find(|d| d.similarity > EXACT_MATCH_SIMILARITY) {
            if let Some(cached) = interpretation::Entity::find()
                .filter(interpretation::Column::DreamId.eq(hit.id))
                .one(&*state.db)
                .await?
            {
                info!(dream_id = %hit.id, similarity = hit.similarity, "Semantic cache hit");
                if let Some(user_id) = caller {
                    Self::increment_usage(&*state.db, user_id, today).await?;
                }
                return Ok(InterpretationResult {
                    analysis: cached.analysis_text,
                    lucky_numbers: cached.lucky_numbers,
                    is_cached: Some(true),
                    tags: None,
                });
            }
        }

        let similar_texts: Vec<String> = similar.into_iter().map(|d| d.dream_text).collect();
        let context = InterpretPrompt::context_block(&similar_texts);
        let instruction = InterpretPrompt::system_instruction(mode, &context);

        let raw = state.ai.complete_json(&instruction, dream_text).await?;
        let outcome: GenerationOutcome = serde_json::from_str(&raw).map_err(|e| {
            AppError::GenerationFormat(format!("completion was not the expected JSON: {}", e))
        })?;

        match caller {
            Some(user_id) if !outcome.refused => {
                Self::persist(state, user_id, dream_text, embedding, &outcome, mode, today)
                    .await?;
            }
            Some(_) => {
                info!("Model refused the input; nothing persisted");
            }
            None => {}
        }

        Ok(InterpretationResult {
            analysis: outcome.analysis,
            lucky_numbers: outcome.lucky_numbers,
            is_cached: None,
            tags: Some(outcome.tags),
        })
    }

    async fn usage_today(
        db: &DatabaseConnection,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<i32, AppError> {
        let usage = user_usage::Entity::find_by_id((user_id, date))
            .one(db)
            .await?;
        Ok(usage.map(|u| u.request_count).unwrap_or(0))
    }

    /// Atomic conditional upsert: the increment only applies while the
    /// counter is below the cap, so concurrent requests cannot overshoot it.
    async fn increment_usage(
        db: &DatabaseConnection,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<(), AppError> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"INSERT INTO user_usage (user_id, date, request_count)
               VALUES ($1, $2, 1)
               ON CONFLICT (user_id, date)
               DO UPDATE SET request_count = user_usage.request_count + 1
               WHERE user_usage.request_count < $3"#,
            [user_id.into(), date.into(), DAILY_QUOTA.into()],
        );
        db.execute(stmt).await?;
        Ok(())
    }

    /// Vector similarity search through the `match_dreams` stored procedure.
    /// Passing the caller id lets anonymous context stay global while
    /// authenticated users also match their own history.
    async fn find_similar_dreams(
        db: &DatabaseConnection,
        embedding: &[f32],
        threshold: f64,
        caller: Option<Uuid>,
    ) -> Result<Vec<SimilarDream>, AppError> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT id, dream_text, similarity FROM match_dreams($1::vector, $2, $3, $4)",
            [
                embedding.to_vec().into(),
                threshold.into(),
                MATCH_COUNT.into(),
                caller.into(),
            ],
        );
        let rows = SimilarDream::find_by_statement(stmt).all(db).await?;
        Ok(rows)
    }

    async fn persist(
        state: &AppState,
        user_id: Uuid,
        dream_text: &str,
        embedding: Vec<f32>,
        outcome: &GenerationOutcome,
        mode: AnalysisMode,
        today: NaiveDate,
    ) -> Result<(), AppError> {
        let now = Utc::now().naive_utc();

        let saved_dream = dream::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(Some(user_id)),
            dream_text: Set(dream_text.to_string()),
            embedding: Set(embedding),
            tags: Set(outcome.tags.clone()),
            created_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&*state.db)
        .await?;

        interpretation::ActiveModel {
            id: Set(Uuid::new_v4()),
            dream_id: Set(saved_dream.id),
            analysis_text: Set(outcome.analysis.clone()),
            lucky_numbers: Set(outcome.lucky_numbers.clone()),
            stress_score: Set(outcome.metrics.stress_score()),
            anxiety_score: Set(outcome.metrics.anxiety_score()),
            happiness_score: Set(outcome.metrics.happiness_score()),
            rating: Set(None),
            researcher_note: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*state.db)
        .await?;

        Self::increment_usage(&*state.db, user_id, today).await?;

        AuditService::record(
            &*state.db,
            Some(user_id),
            actions::INTERPRET_DREAM,
            json!({
                "dream_id": saved_dream.id,
                "input_type": mode.as_str(),
                "timestamp": Utc::now().to_rfc3339(),
            }),
        )
        .await;

        // Dictionary growth is best-effort; a failed upsert never fails
        // the interpretation that produced the tag.
        for tag in &outcome.tags {
            Self::upsert_symbol(&*state.db, tag).await;
        }

        Ok(())
    }

    async fn upsert_symbol(db: &DatabaseConnection, tag: &str) {
        let entry = symbol_dictionary::ActiveModel {
            symbol_word: Set(tag.to_string()),
            meaning: Set("AI Generated".to_string()),
            cultural_context: Set("Thai".to_string()),
        };
        let result = symbol_dictionary::Entity::insert(entry)
            .on_conflict(
                OnConflict::column(symbol_dictionary::Column::SymbolWord)
                    .update_column(symbol_dictionary::Column::Meaning)
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;
        if let Err(e) = result {
            warn!(tag, "Symbol dictionary upsert failed: {}", e);
        }
    }

    /// The caller's dream history, newest first, deleted dreams excluded.
    pub async fn history(
        db: &DatabaseConnection,
        user_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<DreamHistoryItem>, AppError> {
        let mut query = dream::Entity::find()
            .find_also_related(interpretation::Entity)
            .filter(dream::Column::UserId.eq(user_id))
            .filter(dream::Column::DeletedAt.is_null())
            .order_by_desc(dream::Column::CreatedAt);

        if let Some(term) = search.filter(|t| !t.is_empty()) {
            query = query.filter(dream::Column::DreamText.contains(term));
        }

        let rows = query.all(db).await?;
        Ok(rows
            .into_iter()
            .map(|(d, i)| DreamHistoryItem::from_models(d, i))
            .collect())
    }

    /// Soft-deletes one of the caller's own dreams. An already deleted
    /// dream is not found; only admins can restore.
    pub async fn soft_delete(
        db: &DatabaseConnection,
        user_id: Uuid,
        dream_id: Uuid,
    ) -> Result<(), AppError> {
        let found = dream::Entity::find_by_id(dream_id)
            .filter(dream::Column::UserId.eq(user_id))
            .filter(dream::Column::DeletedAt.is_null())
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("ไม่พบความฝันนี้"))?;

        let mut active: dream::ActiveModel = found.into();
        active.deleted_at = Set(Some(Utc::now().naive_utc()));
        active.update(db).await?;

        AuditService::record(
            db,
            Some(user_id),
            actions::DELETE_DREAM,
            json!({ "dream_id": dream_id }),
        )
        .await;

        Ok(())
    }

    /// Stores the caller's 1-5 star rating on their dream's interpretation.
    pub async fn rate(
        db: &DatabaseConnection,
        user_id: Uuid,
        dream_id: Uuid,
        rating: i32,
    ) -> Result<(), AppError> {
        // Ownership and lifecycle are checked through the dream row.
        dream::Entity::find_by_id(dream_id)
            .filter(dream::Column::UserId.eq(user_id))
            .filter(dream::Column::DeletedAt.is_null())
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("ไม่พบความฝันนี้"))?;

        let found = interpretation::Entity::find()
            .filter(interpretation::Column::DreamId.eq(dream_id))
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("ยังไม่มีคำทำนายสำหรับความฝันนี้"))?;

        let mut active: interpretation::ActiveModel = found.into();
        active.rating = Set(Some(rating));
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(db).await?;

        AuditService::record(
            db,
            Some(user_id),
            actions::RATE_INTERPRETATION,
            json!({ "dream_id": dream_id, "rating": rating }),
        )
        .await;

        Ok(())
    }
}
