//! Filter conditions for list and count queries.
//!
//! A filter travels as a three-element JSON array, `[field, operator, value]`,
//! and a filter list as an array of those.

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operators understood by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "like")]
    Like,
    #[serde(rename = "not like")]
    NotLike,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not in")]
    NotIn,
    #[serde(rename = "is")]
    Is,
    #[serde(rename = "between")]
    Between,
    #[serde(rename = "timespan")]
    Timespan,
    #[serde(rename = "descendants of")]
    DescendantsOf,
    #[serde(rename = "not descendants of")]
    NotDescendantsOf,
    #[serde(rename = "ancestors of")]
    AncestorsOf,
    #[serde(rename = "not ancestors of")]
    NotAncestorsOf,
}

impl FilterOperator {
    /// The operator as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "=",
            FilterOperator::NotEq => "!=",
            FilterOperator::Gt => ">",
            FilterOperator::Lt => "<",
            FilterOperator::Ge => ">=",
            FilterOperator::Le => "<=",
            FilterOperator::Like => "like",
            FilterOperator::NotLike => "not like",
            FilterOperator::In => "in",
            FilterOperator::NotIn => "not in",
            FilterOperator::Is => "is",
            FilterOperator::Between => "between",
            FilterOperator::Timespan => "timespan",
            FilterOperator::DescendantsOf => "descendants of",
            FilterOperator::NotDescendantsOf => "not descendants of",
            FilterOperator::AncestorsOf => "ancestors of",
            FilterOperator::NotAncestorsOf => "not ancestors of",
        }
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `[field, operator, value]` condition.
///
/// # Example
///
/// ```rust,ignore
/// use frappe_sdk_db::{Filter, FilterOperator};
///
/// let open = Filter::eq("status", "Open");
/// let recent = Filter::new("creation", FilterOperator::Timespan, "last week");
/// let priority = Filter::new("priority", FilterOperator::In, serde_json::json!(["High", "Urgent"]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl Filter {
    /// Create a filter.
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// `field = value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Eq, value)
    }

    /// `field != value`
    pub fn not_eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::NotEq, value)
    }

    /// `field like pattern`
    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Like, pattern.into())
    }

    /// `field in (values...)`
    pub fn is_in<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self::new(field, FilterOperator::In, values)
    }

    /// `field is set` / `field is not set`
    pub fn is_set(field: impl Into<String>, set: bool) -> Self {
        Self::new(field, FilterOperator::Is, if set { "set" } else { "not set" })
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.field)?;
        tuple.serialize_element(&self.operator)?;
        tuple.serialize_element(&self.value)?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FilterVisitor;

        impl<'de> Visitor<'de> for FilterVisitor {
            type Value = Filter;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a [field, operator, value] array")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Filter, A::Error> {
                let field = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let operator = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let value = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(2, &self))?;
                Ok(Filter {
                    field,
                    operator,
                    value,
                })
            }
        }

        deserializer.deserialize_tuple(3, FilterVisitor)
    }
}
