//! List-route query parameters.
//!
//! Each parameter arrives as a JSON-encoded value in the query string:
//! `where` filters by per-field equality, `sort` takes field-to-`1`/`-1`
//! pairs, `select` projects fields in or out, `skip`/`limit` paginate,
//! and `count=true` returns the number of matching documents instead of
//! the documents themselves. Evaluation happens over the JSON rendering
//! of the documents; the engine never sees any of this.

use crate::error::ApiError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Query parameters as they arrive on a list route.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawListParams {
    /// JSON object of field equality constraints.
    #[serde(rename = "where")]
    pub where_: Option<String>,
    /// JSON object of field to sort direction (`1` or `-1`).
    pub sort: Option<String>,
    /// JSON object of field to `0`/`1` projection flags.
    pub select: Option<String>,
    /// Documents to skip after sorting.
    pub skip: Option<usize>,
    /// Maximum documents to return.
    pub limit: Option<usize>,
    /// When true, return the match count instead of documents.
    #[serde(default)]
    pub count: bool,
}

/// A parsed list query.
#[derive(Debug, Default)]
pub struct ListQuery {
    /// Field equality constraints.
    pub filter: Option<Map<String, Value>>,
    /// Sort keys with direction (negative means descending).
    pub sort: Option<Vec<(String, i64)>>,
    /// Projection flags per field.
    pub select: Option<Vec<(String, bool)>>,
    /// Documents to skip.
    pub skip: Option<usize>,
    /// Maximum documents to return.
    pub limit: Option<usize>,
}

impl ListQuery {
    /// Parses the raw parameters.
    ///
    /// # Errors
    ///
    /// Returns a `400` if any JSON-valued parameter fails to parse or
    /// is not an object.
    pub fn parse(raw: &RawListParams) -> Result<Self, ApiError> {
        Ok(Self {
            filter: parse_object(raw.where_.as_deref())?,
            sort: parse_object(raw.sort.as_deref())?.map(|map| {
                map.into_iter()
                    .map(|(k, v)| (k, v.as_i64().unwrap_or(1)))
                    .collect()
            }),
            select: parse_object(raw.select.as_deref())?.map(|map| {
                map.into_iter()
                    .map(|(k, v)| (k, v.as_i64() != Some(0)))
                    .collect()
            }),
            skip: raw.skip,
            limit: raw.limit,
        })
    }

    /// Filters, sorts, paginates, and projects documents.
    #[must_use]
    pub fn apply(&self, mut docs: Vec<Value>) -> Vec<Value> {
        if let Some(filter) = &self.filter {
            docs.retain(|doc| matches(doc, filter));
        }
        if let Some(sort) = &self.sort {
            docs.sort_by(|a, b| compare_docs(a, b, sort));
        }
        let skip = self.skip.unwrap_or(0);
        let mut docs: Vec<Value> = docs.into_iter().skip(skip).collect();
        if let Some(limit) = self.limit {
            docs.truncate(limit);
        }
        if self.select.is_some() {
            docs = docs.into_iter().map(|doc| self.project_one(doc)).collect();
        }
        docs
    }

    /// Returns the number of documents matching the filter, ignoring
    /// pagination and projection.
    #[must_use]
    pub fn count_matching(&self, docs: &[Value]) -> usize {
        match &self.filter {
            Some(filter) => docs.iter().filter(|doc| matches(doc, filter)).count(),
            None => docs.len(),
        }
    }

    /// Applies only the projection to a single document.
    #[must_use]
    pub fn project_one(&self, doc: Value) -> Value {
        let Some(select) = &self.select else {
            return doc;
        };
        let Value::Object(obj) = doc else {
            return doc;
        };

        let included: Vec<&str> = select
            .iter()
            .filter(|(_, inc)| *inc)
            .map(|(k, _)| k.as_str())
            .collect();

        if included.is_empty() {
            // Exclusion mode: drop the listed fields.
            let mut out = obj;
            for (key, _) in select {
                out.remove(key);
            }
            Value::Object(out)
        } else {
            // Inclusion mode: keep the listed fields; `id` rides along
            // unless explicitly excluded.
            let id_excluded = select.iter().any(|(k, inc)| k == "id" && !inc);
            let mut out = Map::new();
            if !id_excluded {
                if let Some(id) = obj.get("id") {
                    out.insert("id".into(), id.clone());
                }
            }
            for key in included {
                if let Some(value) = obj.get(key) {
                    out.insert(key.to_string(), value.clone());
                }
            }
            Value::Object(out)
        }
    }
}

/// Parses an optional JSON-object parameter.
fn parse_object(raw: Option<&str>) -> Result<Option<Map<String, Value>>, ApiError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        _ => Err(ApiError::bad_request("Invalid JSON in query parameter")),
    }
}

/// Per-field equality match.
fn matches(doc: &Value, filter: &Map<String, Value>) -> bool {
    filter
        .iter()
        .all(|(key, expected)| doc.get(key) == Some(expected))
}

fn compare_docs(a: &Value, b: &Value, sort: &[(String, i64)]) -> Ordering {
    for (key, direction) in sort {
        let ordering = compare_values(a.get(key), b.get(key));
        let ordering = if *direction < 0 {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Orders JSON values: absent < null < bool < number < string; other
/// types compare equal among themselves.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(Value::Array(_)) => 5,
            Some(Value::Object(_)) => 6,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
