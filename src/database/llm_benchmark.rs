use diesel::prelude::*;

use super::{DbPool, DbResult};
use crate::controller::BaseError;
use crate::{db_execute, db_object};

db_object! {
    #[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
    #[diesel(table_name = llm_benchmark)]
    #[diesel(primary_key(benchmark_type))]
    pub struct LlmBenchmark {
        pub benchmark_type: String,
        pub display_name: String,
        pub category_group: String,
        pub description: String,
        pub explanation: Option<String>,
        pub sort_order: i32,
        pub created_at: i64,
    }
}

impl LlmBenchmark {
    /// The whole catalog in display order.
    pub fn list_all(pool: &DbPool) -> DbResult<Vec<LlmBenchmark>> {
        let conn = &mut pool.get()?;
        db_execute!(conn, {
            let rows = llm_benchmark::table
                .order(llm_benchmark::dsl::sort_order.asc())
                .select(LlmBenchmarkDb::as_select())
                .load::<LlmBenchmarkDb>(conn)
                .map_err(|e| {
                    BaseError::DatabaseFatal(Some(format!("Failed to list benchmarks: {}", e)))
                })?;
            Ok(rows.into_iter().map(|row| row.from_db()).collect())
        })
    }

    /// Entries whose group equals `group` exactly. Unknown groups match nothing.
    pub fn list_by_group(pool: &DbPool, group: &str) -> DbResult<Vec<LlmBenchmark>> {
        let conn = &mut pool.get()?;
        db_execute!(conn, {
            let rows = llm_benchmark::table
                .filter(llm_benchmark::dsl::category_group.eq(group))
                .order(llm_benchmark::dsl::sort_order.asc())
                .select(LlmBenchmarkDb::as_select())
                .load::<LlmBenchmarkDb>(conn)
                .map_err(|e| {
                    BaseError::DatabaseFatal(Some(format!(
                        "Failed to list benchmarks of group '{}': {}",
                        group, e
                    )))
                })?;
            Ok(rows.into_iter().map(|row| row.from_db()).collect())
        })
    }

    pub fn get_by_type(pool: &DbPool, benchmark_type_val: &str) -> DbResult<LlmBenchmark> {
        let conn = &mut pool.get()?;
        db_execute!(conn, {
            let row = llm_benchmark::table
                .find(benchmark_type_val)
                .select(LlmBenchmarkDb::as_select())
                .first::<LlmBenchmarkDb>(conn)
                .map_err(|e| match e {
                    diesel::result::Error::NotFound => BaseError::NotFound(Some(format!(
                        "benchmark '{}' not found",
                        benchmark_type_val
                    ))),
                    _ => BaseError::DatabaseFatal(Some(format!(
                        "Error fetching benchmark '{}': {}",
                        benchmark_type_val, e
                    ))),
                })?;
            Ok(row.from_db())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;
    use crate::database::test_support::memory_pool;
    use crate::service::ranking::BenchmarkType;

    #[test]
    fn test_seeded_catalog_matches_benchmark_types() {
        let pool = memory_pool();
        let catalog = LlmBenchmark::list_all(&pool).unwrap();
        assert_eq!(catalog.len(), BenchmarkType::iter().count());

        for (position, (entry, expected)) in catalog.iter().zip(BenchmarkType::iter()).enumerate() {
            let parsed = BenchmarkType::from_str(&entry.benchmark_type).unwrap();
            assert_eq!(parsed, expected);
            assert_eq!(entry.category_group, parsed.category_group().to_string());
            assert_eq!(entry.sort_order, position as i32 + 1);
        }
    }

    #[test]
    fn test_list_by_reasoning_group() {
        let pool = memory_pool();
        let reasoning = LlmBenchmark::list_by_group(&pool, "Reasoning").unwrap();
        let types: Vec<&str> = reasoning.iter().map(|b| b.benchmark_type.as_str()).collect();
        assert_eq!(
            types,
            vec!["AA_LCR", "HUMANITYS_LAST_EXAM", "MMLU_PRO", "GPQA_DIAMOND"]
        );
        assert!(reasoning.windows(2).all(|w| w[0].sort_order < w[1].sort_order));
    }

    #[test]
    fn test_list_by_group_is_case_sensitive() {
        let pool = memory_pool();
        assert!(LlmBenchmark::list_by_group(&pool, "reasoning").unwrap().is_empty());
        assert!(LlmBenchmark::list_by_group(&pool, "Vision").unwrap().is_empty());
    }

    #[test]
    fn test_get_by_type() {
        let pool = memory_pool();
        let aime = LlmBenchmark::get_by_type(&pool, "AIME_2025").unwrap();
        assert_eq!(aime.category_group, "Specialized");
        assert!(matches!(
            LlmBenchmark::get_by_type(&pool, "NOPE"),
            Err(BaseError::NotFound(_))
        ));
    }
}
