//! Mandatory filter enforcement
//!
//! Every synthesized query excludes deleted and duplicate postings, no matter
//! what the model produced. Enforcement is idempotent.

use querysmith_domain::EsQuery;
use serde_json::{json, Map, Value};

/// Clauses present in the `bool.filter` list of every synthesized query
pub fn mandatory_filters() -> [Value; 2] {
    [
        json!({"term": {"is_deleted.keyword": "0"}}),
        json!({"term": {"is_duplicate": false}}),
    ]
}

/// Rewrite the root clause so it is a bool query carrying the mandatory filters
///
/// - missing or non-object root becomes `match_all`
/// - a root that is not a lone `bool` clause is wrapped as `bool.must[root]`
/// - a single-object `bool.filter` becomes a one-element list
/// - mandatory filters already present (by structural equality) are not repeated
pub fn enforce_mandatory_filters(mut query: EsQuery) -> EsQuery {
    let root = match query.query.take() {
        Some(Value::Object(map)) if !map.is_empty() => map,
        _ => single("match_all", json!({})),
    };

    let mut bool_clause = match into_lone_bool(root) {
        Ok(bool_clause) => bool_clause,
        Err(root) => single("must", Value::Array(vec![Value::Object(root)])),
    };

    let mut filters = match bool_clause.remove("filter") {
        Some(Value::Array(items)) => items,
        Some(obj @ Value::Object(_)) => vec![obj],
        _ => Vec::new(),
    };

    for mandatory in mandatory_filters() {
        if !filters.contains(&mandatory) {
            filters.push(mandatory);
        }
    }

    bool_clause.insert("filter".to_string(), Value::Array(filters));
    query.query = Some(Value::Object(single("bool", Value::Object(bool_clause))));
    query
}

fn into_lone_bool(mut root: Map<String, Value>) -> Result<Map<String, Value>, Map<String, Value>> {
    if root.len() != 1 || !matches!(root.get("bool"), Some(Value::Object(_))) {
        return Err(root);
    }
    match root.remove("bool") {
        Some(Value::Object(bool_clause)) => Ok(bool_clause),
        _ => Err(root),
    }
}

fn single(key: &str, value: Value) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters_of(query: &EsQuery) -> &Vec<Value> {
        query.query.as_ref().unwrap()["bool"]["filter"]
            .as_array()
            .unwrap()
    }

    #[test]
    fn test_missing_root_becomes_match_all() {
        let query = enforce_mandatory_filters(EsQuery::default());
        let root = query.query.as_ref().unwrap();
        assert_eq!(root["bool"]["must"][0], json!({"match_all": {}}));
        assert_eq!(filters_of(&query).len(), 2);
    }

    #[test]
    fn test_non_bool_root_is_wrapped() {
        let query = enforce_mandatory_filters(EsQuery::with_query(
            json!({"match": {"job_title": "engineer"}}),
        ));
        let root = query.query.as_ref().unwrap();
        assert_eq!(root["bool"]["must"][0]["match"]["job_title"], "engineer");
        assert_eq!(filters_of(&query), &mandatory_filters().to_vec());
    }

    #[test]
    fn test_existing_bool_keeps_clauses() {
        let query = enforce_mandatory_filters(EsQuery::with_query(json!({
            "bool": {
                "must": [{"match": {"skills.name": "rust"}}],
                "filter": [{"term": {"location.keyword": "Berlin"}}]
            }
        })));
        let root = query.query.as_ref().unwrap();
        assert_eq!(root["bool"]["must"][0]["match"]["skills.name"], "rust");
        let filters = filters_of(&query);
        assert_eq!(filters.len(), 3);
        assert_eq!(filters[0]["term"]["location.keyword"], "Berlin");
    }

    #[test]
    fn test_single_object_filter_normalized() {
        let query = enforce_mandatory_filters(EsQuery::with_query(json!({
            "bool": {"filter": {"term": {"is_duplicate": false}}}
        })));
        let filters = filters_of(&query);
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0], json!({"term": {"is_duplicate": false}}));
        assert_eq!(filters[1], json!({"term": {"is_deleted.keyword": "0"}}));
    }

    #[test]
    fn test_present_filters_not_duplicated() {
        let query = enforce_mandatory_filters(EsQuery::with_query(json!({
            "bool": {"filter": [
                {"term": {"is_deleted.keyword": "0"}},
                {"term": {"is_duplicate": false}}
            ]}
        })));
        assert_eq!(filters_of(&query).len(), 2);
    }

    #[test]
    fn test_other_top_level_keys_untouched() {
        let mut input = EsQuery::with_query(json!({"match_all": {}}));
        input.size = Some(10);
        input.extra.insert("highlight".to_string(), json!({"fields": {}}));

        let query = enforce_mandatory_filters(input);
        assert_eq!(query.size, Some(10));
        assert!(query.extra.contains_key("highlight"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_clause() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            Just(json!({})),
            Just(json!("match_all")),
            "[a-z_]{1,8}".prop_map(|f| json!({"match": {f: "x"}})),
            "[a-z_]{1,8}".prop_map(|f| json!({"bool": {"must": [{"term": {f: 1}}]}})),
            "[a-z_]{1,8}".prop_map(|f| json!({"bool": {"filter": {"term": {f: true}}}})),
            Just(json!({"bool": {"filter": [{"term": {"is_duplicate": false}}]}})),
        ]
    }

    proptest! {
        /// Property: enforcing twice equals enforcing once
        #[test]
        fn test_enforcement_idempotent(clause in arb_clause()) {
            let query = EsQuery { query: Some(clause), ..EsQuery::default() };
            let once = enforce_mandatory_filters(query);
            let twice = enforce_mandatory_filters(once.clone());
            prop_assert_eq!(once, twice);
        }

        /// Property: both mandatory filters appear exactly once
        #[test]
        fn test_mandatory_filters_present_once(clause in arb_clause()) {
            let query = EsQuery { query: Some(clause), ..EsQuery::default() };
            let enforced = enforce_mandatory_filters(query);
            let filters = enforced.query.as_ref().unwrap()["bool"]["filter"]
                .as_array()
                .unwrap()
                .clone();
            for mandatory in mandatory_filters() {
                prop_assert_eq!(filters.iter().filter(|f| **f == mandatory).count(), 1);
            }
        }
    }
}
