use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::{BenchmarkType, ModelFilter, ModelSummary};
use crate::controller::BaseError;
use crate::database::llm_model::ModelWithCreator;
use crate::database::{PageRequest, PageResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Listing order: `<BENCHMARK_TYPE>[,asc|,desc]`, descending when omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSort {
    pub benchmark: BenchmarkType,
    pub direction: SortDirection,
}

impl Default for ModelSort {
    fn default() -> Self {
        ModelSort {
            benchmark: BenchmarkType::AaIntelligenceIndex,
            direction: SortDirection::Desc,
        }
    }
}

impl FromStr for ModelSort {
    type Err = BaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BaseError::ParamInvalid(Some(format!("invalid sort '{}'", s)));
        let mut parts = s.split(',');
        let benchmark = parts
            .next()
            .map(str::trim)
            .and_then(|name| BenchmarkType::from_str(name).ok())
            .ok_or_else(invalid)?;
        let direction = match parts.next().map(str::trim) {
            None => SortDirection::Desc,
            Some(d) if d.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            Some(d) if d.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            Some(_) => return Err(invalid()),
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(ModelSort { benchmark, direction })
    }
}

impl fmt::Display for ModelSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{},{}", self.benchmark, direction)
    }
}

/// Filters, orders by the sort benchmark with unscored models last, and
/// cuts out the requested page.
pub fn list_models(
    rows: &[ModelWithCreator],
    filter: &ModelFilter,
    sort: ModelSort,
    request: PageRequest,
) -> PageResult<ModelSummary> {
    let mut selected = filter.apply(rows);
    selected.sort_by(|a, b| {
        let a_score = sort.benchmark.score_for(&a.model);
        let b_score = sort.benchmark.score_for(&b.model);
        let by_score = match (a_score, b_score) {
            (Some(x), Some(y)) => {
                let natural = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
                match sort.direction {
                    SortDirection::Asc => natural,
                    SortDirection::Desc => natural.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_score.then_with(|| a.model.id.cmp(&b.model.id))
    });

    PageResult::from_sorted(selected, request).map(ModelSummary::from)
}
