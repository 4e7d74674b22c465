use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::FindOptions;
use serde_json::Value;
use std::cmp::Ordering;
use std::str::FromStr;
use strum_macros::EnumString;

use crate::shared::AppError;

/// Number of documents returned by the popular services listing
pub const POPULAR_SERVICES_LIMIT: i64 = 4;

/// Parses a path segment into a store identifier
pub fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| AppError::InvalidId(raw.to_string()))
}

/// Sort direction accepted by the listing endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum SortOrder {
    #[strum(serialize = "asc", serialize = "ascending", serialize = "1")]
    Ascending,
    #[strum(serialize = "desc", serialize = "descending", serialize = "-1")]
    Descending,
}

impl SortOrder {
    pub fn as_i32(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    /// Builds a sort only when both parts are given; a lone field or order is ignored
    pub fn from_params(field: Option<&str>, order: Option<&str>) -> Result<Option<Self>, AppError> {
        let (field, order) = match (non_empty(field), non_empty(order)) {
            (Some(field), Some(order)) => (field, order),
            _ => return Ok(None),
        };

        let order = SortOrder::from_str(order)
            .map_err(|_| AppError::BadRequest(format!("Unsupported sortOrder: {}", order)))?;

        Ok(Some(Self {
            field: field.to_string(),
            order,
        }))
    }

    pub fn to_document(&self) -> Document {
        let mut sort = Document::new();
        sort.insert(self.field.clone(), self.order.as_i32());
        sort
    }
}

/// Filter, sort and limit for a service listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceQuery {
    pub name_contains: Option<String>,
    pub sort: Option<SortSpec>,
    pub limit: Option<i64>,
}

impl ServiceQuery {
    pub fn popular() -> Self {
        Self {
            limit: Some(POPULAR_SERVICES_LIMIT),
            ..Self::default()
        }
    }

    /// Case-insensitive substring match on `serviceName`
    pub fn matches_name(&self, service_name: &str) -> bool {
        match &self.name_contains {
            Some(needle) => service_name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        }
    }

    /// The user text is escaped so it is matched literally by the store's regex engine
    pub fn to_filter(&self) -> Document {
        match &self.name_contains {
            Some(needle) => doc! {
                "serviceName": { "$regex": regex::escape(needle), "$options": "i" }
            },
            None => Document::new(),
        }
    }

    pub fn to_find_options(&self) -> FindOptions {
        let mut options = FindOptions::default();
        options.sort = self.sort.as_ref().map(SortSpec::to_document);
        options.limit = self.limit;
        options
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Orders JSON values the way the store orders mixed BSON types:
/// missing/null, then numbers, strings, objects, arrays, booleans
pub fn compare_json(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Number(_)) => 1,
            Some(Value::String(_)) => 2,
            Some(Value::Object(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Bool(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("asc", SortOrder::Ascending)]
    #[case("ASC", SortOrder::Ascending)]
    #[case("ascending", SortOrder::Ascending)]
    #[case("1", SortOrder::Ascending)]
    #[case("desc", SortOrder::Descending)]
    #[case("Descending", SortOrder::Descending)]
    #[case("-1", SortOrder::Descending)]
    fn test_sort_order_parsing(#[case] raw: &str, #[case] expected: SortOrder) {
        assert_eq!(SortOrder::from_str(raw).unwrap(), expected);
    }

    #[test]
    fn test_sort_spec_requires_both_parts() {
        assert_eq!(SortSpec::from_params(Some("price"), None).unwrap(), None);
        assert_eq!(SortSpec::from_params(None, Some("asc")).unwrap(), None);
        assert_eq!(SortSpec::from_params(Some(""), Some("asc")).unwrap(), None);

        let spec = SortSpec::from_params(Some("price"), Some("desc"))
            .unwrap()
            .unwrap();
        assert_eq!(spec.field, "price");
        assert_eq!(spec.to_document(), doc! { "price": -1 });
    }

    #[test]
    fn test_sort_spec_rejects_unknown_order() {
        let result = SortSpec::from_params(Some("price"), Some("sideways"));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[rstest]
    #[case("")]
    #[case("not-an-id")]
    #[case("12345")]
    #[case("zzzzzzzzzzzzzzzzzzzzzzzz")]
    fn test_parse_object_id_rejects_malformed(#[case] raw: &str) {
        assert!(matches!(parse_object_id(raw), Err(AppError::InvalidId(_))));
    }

    #[test]
    fn test_parse_object_id_accepts_hex() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn test_name_filter_is_case_insensitive_substring() {
        let query = ServiceQuery {
            name_contains: Some("walk".to_string()),
            ..ServiceQuery::default()
        };

        assert!(query.matches_name("Dog Walking"));
        assert!(query.matches_name("CAT WALKER"));
        assert!(!query.matches_name("Grooming"));
        assert!(ServiceQuery::default().matches_name("anything"));
    }

    #[test]
    fn test_name_filter_escapes_regex_metacharacters() {
        let query = ServiceQuery {
            name_contains: Some("a.b".to_string()),
            ..ServiceQuery::default()
        };

        assert_eq!(
            query.to_filter(),
            doc! { "serviceName": { "$regex": "a\\.b", "$options": "i" } }
        );
        assert_eq!(ServiceQuery::default().to_filter(), Document::new());
    }

    #[test]
    fn test_popular_query_options() {
        let options = ServiceQuery::popular().to_find_options();
        assert_eq!(options.limit, Some(POPULAR_SERVICES_LIMIT));
        assert!(options.sort.is_none());
    }

    #[test]
    fn test_compare_json_orders_mixed_types() {
        assert_eq!(
            compare_json(Some(&json!(2)), Some(&json!(10.5))),
            Ordering::Less
        );
        assert_eq!(
            compare_json(Some(&json!("b")), Some(&json!("a"))),
            Ordering::Greater
        );
        assert_eq!(compare_json(None, Some(&json!(1))), Ordering::Less);
        assert_eq!(
            compare_json(Some(&json!(100)), Some(&json!("1"))),
            Ordering::Less
        );
    }
}
