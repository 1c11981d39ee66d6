use std::collections::HashMap;

use chrono::NaiveDate;
use diesel::prelude::*;

use super::{DbPool, DbResult};
use crate::controller::BaseError;
use crate::{db_execute, db_object};

db_object! {
    #[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone)]
    #[diesel(table_name = model_creator)]
    pub struct ModelCreator {
        pub id: i64,
        pub external_id: Option<String>,
        pub slug: String,
        pub name: String,
        pub created_at: i64,
        pub updated_at: i64,
    }

    #[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone)]
    #[diesel(table_name = llm_model)]
    pub struct LlmModel {
        pub id: i64,
        pub external_id: Option<String>,
        pub slug: Option<String>,
        pub model_id: String,
        pub model_name: String,
        pub release_date: Option<NaiveDate>,
        pub provider: Option<String>,
        pub model_creator_id: Option<i64>,
        pub description: Option<String>,
        pub price_input: Option<f64>,
        pub price_output: Option<f64>,
        pub price_blended: Option<f64>,
        pub context_window: Option<i64>,
        pub output_speed_median: Option<f64>,
        pub latency_ttft: Option<f64>,
        pub median_time_to_first_answer_token: Option<f64>,
        pub license: Option<String>,
        pub score_terminal_bench_hard: Option<f64>,
        pub score_tau_bench_telecom: Option<f64>,
        pub score_aa_lcr: Option<f64>,
        pub score_humanitys_last_exam: Option<f64>,
        pub score_mmlu_pro: Option<f64>,
        pub score_gpqa_diamond: Option<f64>,
        pub score_livecode_bench: Option<f64>,
        pub score_scicode: Option<f64>,
        pub score_ifbench: Option<f64>,
        pub score_math_500: Option<f64>,
        pub score_aime: Option<f64>,
        pub score_aime_2025: Option<f64>,
        pub score_aa_intelligence_index: Option<f64>,
        pub score_aa_coding_index: Option<f64>,
        pub score_aa_math_index: Option<f64>,
        pub created_at: i64,
        pub updated_at: i64,
    }
}

/// A model row paired with its creator, when it has one.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelWithCreator {
    pub model: LlmModel,
    pub creator: Option<ModelCreator>,
}

impl ModelWithCreator {
    /// The legacy provider string wins over the creator's name.
    pub fn display_provider(&self) -> Option<String> {
        self.model
            .provider
            .clone()
            .or_else(|| self.creator.as_ref().map(|c| c.name.clone()))
    }

    pub fn creator_slug(&self) -> Option<&str> {
        self.creator.as_ref().map(|c| c.slug.as_str())
    }
}

impl ModelCreator {
    pub fn list_all(pool: &DbPool) -> DbResult<Vec<ModelCreator>> {
        let conn = &mut pool.get()?;
        db_execute!(conn, {
            let rows = model_creator::table
                .order(model_creator::dsl::id.asc())
                .select(ModelCreatorDb::as_select())
                .load::<ModelCreatorDb>(conn)
                .map_err(|e| {
                    BaseError::DatabaseFatal(Some(format!("Failed to list model creators: {}", e)))
                })?;
            Ok(rows.into_iter().map(|row| row.from_db()).collect())
        })
    }

    pub fn get_by_id(pool: &DbPool, id_value: i64) -> DbResult<Option<ModelCreator>> {
        let conn = &mut pool.get()?;
        db_execute!(conn, {
            let row = model_creator::table
                .find(id_value)
                .select(ModelCreatorDb::as_select())
                .first::<ModelCreatorDb>(conn)
                .optional()
                .map_err(|e| {
                    BaseError::DatabaseFatal(Some(format!(
                        "Error fetching model creator {}: {}",
                        id_value, e
                    )))
                })?;
            Ok(row.map(|r| r.from_db()))
        })
    }
}

impl LlmModel {
    pub fn list_all(pool: &DbPool) -> DbResult<Vec<LlmModel>> {
        let conn = &mut pool.get()?;
        db_execute!(conn, {
            let rows = llm_model::table
                .order(llm_model::dsl::id.asc())
                .select(LlmModelDb::as_select())
                .load::<LlmModelDb>(conn)
                .map_err(|e| {
                    BaseError::DatabaseFatal(Some(format!("Failed to list llm models: {}", e)))
                })?;
            Ok(rows.into_iter().map(|row| row.from_db()).collect())
        })
    }

    /// Looks a model up by its public `model_id` key.
    pub fn get_by_model_id(pool: &DbPool, model_id_val: &str) -> DbResult<LlmModel> {
        let conn = &mut pool.get()?;
        db_execute!(conn, {
            let row = llm_model::table
                .filter(llm_model::dsl::model_id.eq(model_id_val))
                .select(LlmModelDb::as_select())
                .first::<LlmModelDb>(conn)
                .map_err(|e| match e {
                    diesel::result::Error::NotFound => BaseError::NotFound(Some(format!(
                        "model '{}' not found",
                        model_id_val
                    ))),
                    _ => BaseError::DatabaseFatal(Some(format!(
                        "Error fetching model '{}': {}",
                        model_id_val, e
                    ))),
                })?;
            Ok(row.from_db())
        })
    }

    pub fn get_with_creator(pool: &DbPool, model_id_val: &str) -> DbResult<ModelWithCreator> {
        let model = LlmModel::get_by_model_id(pool, model_id_val)?;
        let creator = match model.model_creator_id {
            Some(creator_id) => ModelCreator::get_by_id(pool, creator_id)?,
            None => None,
        };
        Ok(ModelWithCreator { model, creator })
    }

    /// Every model joined with its creator, ordered by id.
    pub fn list_with_creators(pool: &DbPool) -> DbResult<Vec<ModelWithCreator>> {
        let creators: HashMap<i64, ModelCreator> = ModelCreator::list_all(pool)?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let models = LlmModel::list_all(pool)?;
        Ok(models
            .into_iter()
            .map(|model| {
                let creator = model
                    .model_creator_id
                    .and_then(|id| creators.get(&id).cloned());
                ModelWithCreator { model, creator }
            })
            .collect())
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use super::{_postgres_model, _sqlite_model};

    pub fn model(id: i64, model_id: &str) -> LlmModel {
        LlmModel {
            id,
            external_id: None,
            slug: Some(model_id.to_string()),
            model_id: model_id.to_string(),
            model_name: model_id.to_uppercase(),
            release_date: None,
            provider: None,
            model_creator_id: None,
            description: None,
            price_input: None,
            price_output: None,
            price_blended: None,
            context_window: None,
            output_speed_median: None,
            latency_ttft: None,
            median_time_to_first_answer_token: None,
            license: None,
            score_terminal_bench_hard: None,
            score_tau_bench_telecom: None,
            score_aa_lcr: None,
            score_humanitys_last_exam: None,
            score_mmlu_pro: None,
            score_gpqa_diamond: None,
            score_livecode_bench: None,
            score_scicode: None,
            score_ifbench: None,
            score_math_500: None,
            score_aime: None,
            score_aime_2025: None,
            score_aa_intelligence_index: None,
            score_aa_coding_index: None,
            score_aa_math_index: None,
            created_at: 1_700_000_000_000,
            updated_at: 1_700_000_000_000,
        }
    }

    pub fn creator(id: i64, slug: &str, name: &str) -> ModelCreator {
        ModelCreator {
            id,
            external_id: None,
            slug: slug.to_string(),
            name: name.to_string(),
            created_at: 1_700_000_000_000,
            updated_at: 1_700_000_000_000,
        }
    }

    pub fn insert_creator(pool: &DbPool, value: &ModelCreator) {
        let conn = &mut pool.get().unwrap();
        db_execute!(conn, {
            diesel::insert_into(model_creator::table)
                .values(ModelCreatorDb::to_db(value))
                .execute(conn)
                .unwrap();
        })
    }

    pub fn insert_model(pool: &DbPool, value: &LlmModel) {
        let conn = &mut pool.get().unwrap();
        db_execute!(conn, {
            diesel::insert_into(llm_model::table)
                .values(LlmModelDb::to_db(value))
                .execute(conn)
                .unwrap();
        })
    }
}
