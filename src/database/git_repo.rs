use diesel::prelude::*;

use super::{DbPool, DbResult, PageRequest, PageResult};
use crate::controller::BaseError;
use crate::schema::enum_def::Category;
use crate::{db_execute, db_object};

db_object! {
    #[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone)]
    #[diesel(table_name = git_repo)]
    pub struct GitRepo {
        pub id: i64,
        pub full_name: String,
        pub url: String,
        pub description: Option<String>,
        pub language: Option<String>,
        pub stars: Option<i32>,
        pub forks: Option<i32>,
        pub stars_this_week: Option<i32>,
        pub summary_ko_title: Option<String>,
        pub summary_ko_body: Option<String>,
        pub category: Option<Category>,
        pub score: i32,
        pub created_at: i64,
        pub updated_at: i64,
    }
}

fn query_error(what: &str, e: diesel::result::Error) -> BaseError {
    BaseError::DatabaseFatal(Some(format!("Failed to {}: {}", what, e)))
}

impl GitRepo {
    /// Repositories by score, newest first among equal scores.
    pub fn list_page(
        pool: &DbPool,
        category_val: Option<Category>,
        request: PageRequest,
    ) -> DbResult<PageResult<GitRepo>> {
        let conn = &mut pool.get()?;
        db_execute!(conn, {
            let mut count_query = git_repo::table.into_boxed();
            let mut page_query = git_repo::table.into_boxed();
            if let Some(c) = category_val {
                count_query = count_query.filter(git_repo::dsl::category.eq(c));
                page_query = page_query.filter(git_repo::dsl::category.eq(c));
            }

            let total = count_query
                .count()
                .get_result::<i64>(conn)
                .map_err(|e| query_error("count git repos", e))?;
            let rows = page_query
                .order((
                    git_repo::dsl::score.desc(),
                    git_repo::dsl::created_at.desc(),
                    git_repo::dsl::id.asc(),
                ))
                .offset(request.offset())
                .limit(request.size)
                .select(GitRepoDb::as_select())
                .load::<GitRepoDb>(conn)
                .map_err(|e| query_error("list git repos", e))?;

            Ok(PageResult::new(
                rows.into_iter().map(|r| r.from_db()).collect(),
                total,
                request,
            ))
        })
    }

    /// Repositories by weekly star gain. Rows without a weekly count go last.
    pub fn list_trending(pool: &DbPool, request: PageRequest) -> DbResult<PageResult<GitRepo>> {
        let conn = &mut pool.get()?;
        db_execute!(conn, {
            let total = git_repo::table
                .count()
                .get_result::<i64>(conn)
                .map_err(|e| query_error("count git repos", e))?;
            let rows = git_repo::table
                .order((
                    git_repo::dsl::stars_this_week.is_null().asc(),
                    git_repo::dsl::stars_this_week.desc(),
                    git_repo::dsl::id.asc(),
                ))
                .offset(request.offset())
                .limit(request.size)
                .select(GitRepoDb::as_select())
                .load::<GitRepoDb>(conn)
                .map_err(|e| query_error("list trending git repos", e))?;

            Ok(PageResult::new(
                rows.into_iter().map(|r| r.from_db()).collect(),
                total,
                request,
            ))
        })
    }

    pub fn list_by_language(
        pool: &DbPool,
        language_val: &str,
        limit: i64,
    ) -> DbResult<Vec<GitRepo>> {
        let conn = &mut pool.get()?;
        db_execute!(conn, {
            let rows = git_repo::table
                .filter(git_repo::dsl::language.eq(language_val))
                .order((git_repo::dsl::score.desc(), git_repo::dsl::id.asc()))
                .limit(limit)
                .select(GitRepoDb::as_select())
                .load::<GitRepoDb>(conn)
                .map_err(|e| query_error("list git repos by language", e))?;
            Ok(rows.into_iter().map(|r| r.from_db()).collect())
        })
    }
}
