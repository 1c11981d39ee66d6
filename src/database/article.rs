use diesel::prelude::*;
use serde::Serialize;

use cyder_tools::log::warn;

use super::{DbPool, DbResult, PageRequest, PageResult};
use crate::controller::BaseError;
use crate::schema::enum_def::{Category, ItemType};
use crate::{db_execute, db_object};

pub const GITHUB_SOURCE: &str = "github";

db_object! {
    #[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone)]
    #[diesel(table_name = article)]
    pub struct Article {
        pub id: i64,
        pub item_type: ItemType,
        pub source: String,
        pub category: Category,
        pub summary_ko_title: String,
        pub summary_ko_body: Option<String>,
        pub title_en: String,
        pub url: String,
        pub score: i32,
        pub tags: String,
        pub created_at_source: i64,
        pub stars: Option<i32>,
        pub comments: Option<i32>,
        pub upvotes: Option<i32>,
        pub read_time: Option<String>,
        pub language: Option<String>,
        pub created_at: i64,
        pub updated_at: i64,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleMetadata {
    pub stars: Option<i32>,
    pub comments: Option<i32>,
    pub upvotes: Option<i32>,
    pub read_time: Option<String>,
    pub language: Option<String>,
}

/// Article as served to clients, with tags decoded from their JSON column.
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView {
    pub id: i64,
    pub item_type: ItemType,
    pub source: String,
    pub category: Category,
    pub summary_ko_title: String,
    pub summary_ko_body: Option<String>,
    pub title_en: String,
    pub url: String,
    pub score: i32,
    pub tags: Vec<String>,
    pub created_at_source: i64,
    pub metadata: ArticleMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerItem {
    pub id: i64,
    pub summary_ko_title: String,
    pub url: String,
    pub created_at_source: i64,
}

impl From<Article> for ArticleView {
    fn from(a: Article) -> Self {
        let tags = serde_json::from_str::<Vec<String>>(&a.tags).unwrap_or_else(|e| {
            warn!("article {} has malformed tags {:?}: {}", a.id, a.tags, e);
            Vec::new()
        });
        ArticleView {
            id: a.id,
            item_type: a.item_type,
            source: a.source,
            category: a.category,
            summary_ko_title: a.summary_ko_title,
            summary_ko_body: a.summary_ko_body,
            title_en: a.title_en,
            url: a.url,
            score: a.score,
            tags,
            created_at_source: a.created_at_source,
            metadata: ArticleMetadata {
                stars: a.stars,
                comments: a.comments,
                upvotes: a.upvotes,
                read_time: a.read_time,
                language: a.language,
            },
        }
    }
}

impl From<Article> for TickerItem {
    fn from(a: Article) -> Self {
        TickerItem {
            id: a.id,
            summary_ko_title: a.summary_ko_title,
            url: a.url,
            created_at_source: a.created_at_source,
        }
    }
}

fn query_error(what: &str, e: diesel::result::Error) -> BaseError {
    BaseError::DatabaseFatal(Some(format!("Failed to {}: {}", what, e)))
}

impl Article {
    pub fn list_page(
        pool: &DbPool,
        category_val: Option<Category>,
        request: PageRequest,
    ) -> DbResult<PageResult<Article>> {
        let conn = &mut pool.get()?;
        db_execute!(conn, {
            let mut count_query = article::table.into_boxed();
            let mut page_query = article::table.into_boxed();
            if let Some(c) = category_val {
                count_query = count_query.filter(article::dsl::category.eq(c));
                page_query = page_query.filter(article::dsl::category.eq(c));
            }

            let total = count_query
                .count()
                .get_result::<i64>(conn)
                .map_err(|e| query_error("count articles", e))?;
            let rows = page_query
                .order((
                    article::dsl::score.desc(),
                    article::dsl::created_at_source.desc(),
                    article::dsl::id.asc(),
                ))
                .offset(request.offset())
                .limit(request.size)
                .select(ArticleDb::as_select())
                .load::<ArticleDb>(conn)
                .map_err(|e| query_error("list articles", e))?;

            Ok(PageResult::new(
                rows.into_iter().map(|r| r.from_db()).collect(),
                total,
                request,
            ))
        })
    }

    pub fn list_github_trending(pool: &DbPool, limit: i64) -> DbResult<Vec<Article>> {
        let conn = &mut pool.get()?;
        db_execute!(conn, {
            let rows = article::table
                .filter(article::dsl::source.eq(GITHUB_SOURCE))
                .order((article::dsl::score.desc(), article::dsl::id.asc()))
                .limit(limit)
                .select(ArticleDb::as_select())
                .load::<ArticleDb>(conn)
                .map_err(|e| query_error("list github trending articles", e))?;
            Ok(rows.into_iter().map(|r| r.from_db()).collect())
        })
    }

    pub fn list_trending_ticker(pool: &DbPool, limit: i64) -> DbResult<Vec<TickerItem>> {
        let conn = &mut pool.get()?;
        db_execute!(conn, {
            let rows = article::table
                .order((
                    article::dsl::score.desc(),
                    article::dsl::created_at_source.desc(),
                    article::dsl::id.asc(),
                ))
                .limit(limit)
                .select(ArticleDb::as_select())
                .load::<ArticleDb>(conn)
                .map_err(|e| query_error("list ticker articles", e))?;
            Ok(rows.into_iter().map(|r| TickerItem::from(r.from_db())).collect())
        })
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use super::{_postgres_model, _sqlite_model};

    pub fn article(id: i64, source: &str, score: i32, created_at_source: i64) -> Article {
        Article {
            id,
            item_type: ItemType::Blog,
            source: source.to_string(),
            category: Category::Other,
            summary_ko_title: format!("title {}", id),
            summary_ko_body: None,
            title_en: format!("Title {}", id),
            url: format!("https://example.org/{}", id),
            score,
            tags: r#"["rust","web"]"#.to_string(),
            created_at_source,
            stars: None,
            comments: None,
            upvotes: None,
            read_time: None,
            language: None,
            created_at: created_at_source,
            updated_at: created_at_source,
        }
    }

    pub fn insert_article(pool: &DbPool, value: &Article) {
        let conn = &mut pool.get().unwrap();
        db_execute!(conn, {
            diesel::insert_into(article::table)
                .values(ArticleDb::to_db(value))
                .execute(conn)
                .unwrap();
        })
    }
}
