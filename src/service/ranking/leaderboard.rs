use std::cmp::Ordering;

use super::{BenchmarkType, LeaderboardEntry, ModelFilter};
use crate::database::llm_model::ModelWithCreator;

/// Ranks the filtered models on `benchmark`.
///
/// Models without a score are left out and consume no rank. Equal scores
/// share a rank; the next lower score takes its position (90, 90, 70 ranks
/// as 1, 1, 3). Ties are listed by id.
pub fn build_leaderboard(
    benchmark: BenchmarkType,
    filter: &ModelFilter,
    rows: &[ModelWithCreator],
) -> Vec<LeaderboardEntry> {
    let mut scored: Vec<(f64, &ModelWithCreator)> = filter
        .apply(rows)
        .into_iter()
        .filter_map(|row| benchmark.score_for(&row.model).map(|score| (score, row)))
        .collect();

    scored.sort_by(|(a_score, a), (b_score, b)| {
        b_score
            .partial_cmp(a_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.model.id.cmp(&b.model.id))
    });

    let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(scored.len());
    for (score, row) in scored {
        let rank = match entries.last() {
            Some(prev) if prev.score == score => prev.rank,
            _ => entries.len() as i64 + 1,
        };
        entries.push(LeaderboardEntry {
            id: row.model.id,
            model_id: row.model.model_id.clone(),
            model_name: row.model.model_name.clone(),
            provider: row.display_provider(),
            license: row.model.license.clone(),
            score,
            rank,
            price_blended: row.model.price_blended,
            context_window: row.model.context_window,
        });
    }
    entries
}
