use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Topic bucket shared by articles and git repositories.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    DbEnum,
    Display,
    EnumString,
    EnumIter,
)]
#[db_enum(pg_type = "category_enum")]
#[db_enum(value_style = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    AiLlm,
    DevopsSre,
    InfraCloud,
    Database,
    Blockchain,
    Security,
    DataScience,
    Architecture,
    Mobile,
    Frontend,
    Backend,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, EnumString)]
#[db_enum(pg_type = "item_type_enum")]
#[db_enum(value_style = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    Repo,
    Blog,
    Discussion,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_category_string_forms_agree() {
        for category in Category::iter() {
            let text = category.to_string();
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", text));
            assert_eq!(Category::from_str(&text).unwrap(), category);
        }
        assert_eq!(Category::AiLlm.to_string(), "AI_LLM");
        assert!(Category::from_str("ai_llm").is_err());
    }
}
