use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::database::llm_model::{LlmModel, ModelCreator, ModelWithCreator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCreatorView {
    pub id: i64,
    pub external_id: Option<String>,
    pub slug: String,
    pub name: String,
}

impl From<&ModelCreator> for ModelCreatorView {
    fn from(c: &ModelCreator) -> Self {
        ModelCreatorView {
            id: c.id,
            external_id: c.external_id.clone(),
            slug: c.slug.clone(),
            name: c.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: i64,
    pub model_id: String,
    pub model_name: String,
    pub provider: Option<String>,
    pub license: Option<String>,
    pub score: f64,
    pub rank: i64,
    pub price_blended: Option<f64>,
    pub context_window: Option<i64>,
}

/// Listing row. `rank` is only present where a ranking was computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    pub id: i64,
    pub slug: Option<String>,
    pub model_id: String,
    pub model_name: String,
    pub release_date: Option<NaiveDate>,
    pub provider: Option<String>,
    pub model_creator: Option<ModelCreatorView>,
    pub score_aa_intelligence_index: Option<f64>,
    pub price_blended: Option<f64>,
    pub context_window: Option<i64>,
    pub output_speed_median: Option<f64>,
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,
}

impl From<&ModelWithCreator> for ModelSummary {
    fn from(row: &ModelWithCreator) -> Self {
        let m = &row.model;
        ModelSummary {
            id: m.id,
            slug: m.slug.clone(),
            model_id: m.model_id.clone(),
            model_name: m.model_name.clone(),
            release_date: m.release_date,
            provider: row.display_provider(),
            model_creator: row.creator.as_ref().map(ModelCreatorView::from),
            score_aa_intelligence_index: m.score_aa_intelligence_index,
            price_blended: m.price_blended,
            context_window: m.context_window,
            output_speed_median: m.output_speed_median,
            license: m.license.clone(),
            rank: None,
        }
    }
}

/// Full model record with every score, plus its creator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDetail {
    #[serde(flatten)]
    pub model: LlmModel,
    pub display_provider: Option<String>,
    pub model_creator: Option<ModelCreatorView>,
}

impl From<ModelWithCreator> for ModelDetail {
    fn from(row: ModelWithCreator) -> Self {
        ModelDetail {
            display_provider: row.display_provider(),
            model_creator: row.creator.as_ref().map(ModelCreatorView::from),
            model: row.model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::llm_model::test_support::{creator, model};

    #[test]
    fn test_summary_omits_rank_and_resolves_provider() {
        let mut m = model(5, "llama");
        m.model_creator_id = Some(3);
        let row = ModelWithCreator {
            model: m,
            creator: Some(creator(3, "meta", "Meta")),
        };
        let json = serde_json::to_value(ModelSummary::from(&row)).unwrap();
        assert!(json.get("rank").is_none());
        assert_eq!(json["provider"], "Meta");
        assert_eq!(json["modelCreator"]["slug"], "meta");
        assert_eq!(json["modelId"], "llama");
    }

    #[test]
    fn test_detail_flattens_all_scores() {
        let mut m = model(5, "llama");
        m.score_aime_2025 = Some(42.0);
        let detail = ModelDetail::from(ModelWithCreator { model: m, creator: None });
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["scoreAime2025"], 42.0);
        assert!(json["scoreMath500"].is_null());
        assert!(json.get("createdAt").is_some());
        assert!(json["modelCreator"].is_null());

        let back: ModelDetail = serde_json::from_value(json).unwrap();
        assert_eq!(back, detail);
    }
}
