//! Leaderboard ranking and model listing over rows already read from the store.
//!
//! Everything in here is pure: callers load `ModelWithCreator` rows and the
//! functions below filter, sort, rank and page them.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::database::llm_model::LlmModel;

pub mod dto;
pub mod filter;
pub mod leaderboard;
pub mod listing;

pub use dto::{LeaderboardEntry, ModelCreatorView, ModelDetail, ModelSummary};
pub use filter::ModelFilter;
pub use leaderboard::build_leaderboard;
pub use listing::{ModelSort, SortDirection, list_models};

/// Every benchmark a model can be scored on, in catalog order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BenchmarkType {
    TerminalBenchHard,
    TauBenchTelecom,
    AaLcr,
    HumanitysLastExam,
    MmluPro,
    GpqaDiamond,
    LivecodeBench,
    Scicode,
    Ifbench,
    #[strum(serialize = "MATH_500")]
    #[serde(rename = "MATH_500")]
    Math500,
    Aime,
    #[strum(serialize = "AIME_2025")]
    #[serde(rename = "AIME_2025")]
    Aime2025,
    AaIntelligenceIndex,
    AaCodingIndex,
    AaMathIndex,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum CategoryGroup {
    Agentic,
    Reasoning,
    Coding,
    Specialized,
    Composite,
}

impl BenchmarkType {
    pub fn score_for(self, model: &LlmModel) -> Option<f64> {
        match self {
            BenchmarkType::TerminalBenchHard => model.score_terminal_bench_hard,
            BenchmarkType::TauBenchTelecom => model.score_tau_bench_telecom,
            BenchmarkType::AaLcr => model.score_aa_lcr,
            BenchmarkType::HumanitysLastExam => model.score_humanitys_last_exam,
            BenchmarkType::MmluPro => model.score_mmlu_pro,
            BenchmarkType::GpqaDiamond => model.score_gpqa_diamond,
            BenchmarkType::LivecodeBench => model.score_livecode_bench,
            BenchmarkType::Scicode => model.score_scicode,
            BenchmarkType::Ifbench => model.score_ifbench,
            BenchmarkType::Math500 => model.score_math_500,
            BenchmarkType::Aime => model.score_aime,
            BenchmarkType::Aime2025 => model.score_aime_2025,
            BenchmarkType::AaIntelligenceIndex => model.score_aa_intelligence_index,
            BenchmarkType::AaCodingIndex => model.score_aa_coding_index,
            BenchmarkType::AaMathIndex => model.score_aa_math_index,
        }
    }

    pub fn category_group(self) -> CategoryGroup {
        match self {
            BenchmarkType::TerminalBenchHard | BenchmarkType::TauBenchTelecom => {
                CategoryGroup::Agentic
            }
            BenchmarkType::AaLcr
            | BenchmarkType::HumanitysLastExam
            | BenchmarkType::MmluPro
            | BenchmarkType::GpqaDiamond => CategoryGroup::Reasoning,
            BenchmarkType::LivecodeBench | BenchmarkType::Scicode => CategoryGroup::Coding,
            BenchmarkType::Ifbench
            | BenchmarkType::Math500
            | BenchmarkType::Aime
            | BenchmarkType::Aime2025 => CategoryGroup::Specialized,
            BenchmarkType::AaIntelligenceIndex
            | BenchmarkType::AaCodingIndex
            | BenchmarkType::AaMathIndex => CategoryGroup::Composite,
        }
    }
}
