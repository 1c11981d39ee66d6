use serde::{Deserialize, Serialize};

use crate::controller::BaseError;
use crate::database::llm_model::ModelWithCreator;

/// Optional narrowing criteria shared by the leaderboard and model listing.
/// An unset field imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_context_window: Option<i64>,
}

impl ModelFilter {
    pub fn validate(&self) -> Result<(), BaseError> {
        if let Some(price) = self.max_price {
            if !price.is_finite() {
                return Err(BaseError::ParamInvalid(Some(format!(
                    "maxPrice must be a finite number, got {}",
                    price
                ))));
            }
        }
        Ok(())
    }

    pub fn matches(&self, row: &ModelWithCreator) -> bool {
        let model = &row.model;
        if let Some(provider) = &self.provider {
            if model.provider.as_ref() != Some(provider) {
                return false;
            }
        }
        if let Some(slug) = &self.creator_slug {
            if row.creator_slug() != Some(slug.as_str()) {
                return false;
            }
        }
        if let Some(license) = &self.license {
            if model.license.as_ref() != Some(license) {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            match model.price_blended {
                Some(price) if price <= max_price => {}
                _ => return false,
            }
        }
        if let Some(min_window) = self.min_context_window {
            match model.context_window {
                Some(window) if window >= min_window => {}
                _ => return false,
            }
        }
        true
    }

    pub fn apply<'a>(&self, rows: &'a [ModelWithCreator]) -> Vec<&'a ModelWithCreator> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::llm_model::test_support::{creator, model};

    fn rows() -> Vec<ModelWithCreator> {
        let mut a = model(1, "a");
        a.provider = Some("OpenAI".to_string());
        a.license = Some("Proprietary".to_string());
        a.price_blended = Some(4.5);
        a.context_window = Some(128_000);
        a.model_creator_id = Some(7);

        let mut b = model(2, "b");
        b.license = Some("MIT".to_string());
        b.price_blended = None;
        b.context_window = Some(32_000);
        b.model_creator_id = Some(8);

        let mut c = model(3, "c");
        c.provider = Some("openai".to_string());
        c.price_blended = Some(12.0);
        c.context_window = None;

        vec![
            ModelWithCreator {
                model: a,
                creator: Some(creator(7, "openai", "OpenAI")),
            },
            ModelWithCreator {
                model: b,
                creator: Some(creator(8, "meta", "Meta")),
            },
            ModelWithCreator { model: c, creator: None },
        ]
    }

    fn ids(filter: &ModelFilter) -> Vec<i64> {
        let rows = rows();
        filter.apply(&rows).iter().map(|r| r.model.id).collect()
    }

    #[test]
    fn test_no_criteria_is_identity() {
        assert_eq!(ids(&ModelFilter::default()), vec![1, 2, 3]);
    }

    #[test]
    fn test_string_criteria_are_exact_and_case_sensitive() {
        let by_provider = ModelFilter {
            provider: Some("OpenAI".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&by_provider), vec![1]);

        let by_slug = ModelFilter {
            creator_slug: Some("meta".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&by_slug), vec![2]);

        let by_license = ModelFilter {
            license: Some("mit".to_string()),
            ..Default::default()
        };
        assert!(ids(&by_license).is_empty());
    }

    #[test]
    fn test_provider_does_not_fall_back_to_creator_name() {
        let filter = ModelFilter {
            provider: Some("Meta".to_string()),
            ..Default::default()
        };
        assert!(ids(&filter).is_empty());
    }

    #[test]
    fn test_max_price_excludes_null_price() {
        let filter = ModelFilter {
            max_price: Some(5.0),
            ..Default::default()
        };
        assert_eq!(ids(&filter), vec![1]);

        let inclusive = ModelFilter {
            max_price: Some(4.5),
            ..Default::default()
        };
        assert_eq!(ids(&inclusive), vec![1]);
    }

    #[test]
    fn test_min_context_window_excludes_null_window() {
        let filter = ModelFilter {
            min_context_window: Some(32_000),
            ..Default::default()
        };
        assert_eq!(ids(&filter), vec![1, 2]);
    }

    #[test]
    fn test_excluded_rows_fail_some_criterion() {
        let filter = ModelFilter {
            max_price: Some(10.0),
            min_context_window: Some(64_000),
            ..Default::default()
        };
        let all = rows();
        let kept = filter.apply(&all);
        assert!(kept.iter().all(|r| filter.matches(r)));
        for row in &all {
            if !kept.iter().any(|k| k.model.id == row.model.id) {
                let price_ok = row.model.price_blended.is_some_and(|p| p <= 10.0);
                let window_ok = row.model.context_window.is_some_and(|w| w >= 64_000);
                assert!(!(price_ok && window_ok));
            }
        }
    }

    #[test]
    fn test_validate_rejects_nan_price() {
        let filter = ModelFilter {
            max_price: Some(f64::NAN),
            ..Default::default()
        };
        assert!(filter.validate().is_err());
        assert!(ModelFilter::default().validate().is_ok());
    }
}
