//! Document and query types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::filter::Filter;

/// A document with no fixed schema.
pub type Document = Map<String, Value>;

/// Timestamp format used by the server for `creation` and `modified`.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A document with the standard fields every doctype carries, plus the
/// doctype's own fields in `doc`.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug, Default, Deserialize, Serialize)]
/// struct Note {
///     title: String,
///     public: u8,
/// }
///
/// let note: FrappeDoc<Note> = db.get_doc("Note", "N-0001").await?;
/// println!("{} created {:?}", note.doc.title, note.creation_time());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrappeDoc<T> {
    /// Document name (primary key).
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idx: Option<i64>,
    /// 0 = draft, 1 = submitted, 2 = cancelled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docstatus: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parentfield: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parenttype: Option<String>,
    /// The doctype's own fields.
    #[serde(flatten)]
    pub doc: T,
}

impl<T> FrappeDoc<T> {
    /// `creation` parsed as a naive (site-local) timestamp.
    pub fn creation_time(&self) -> Option<NaiveDateTime> {
        parse_datetime(self.creation.as_deref()?)
    }

    /// `modified` parsed as a naive (site-local) timestamp.
    pub fn modified_time(&self) -> Option<NaiveDateTime> {
        parse_datetime(self.modified.as_deref()?)
    }

    /// Whether the document has been submitted.
    pub fn is_submitted(&self) -> bool {
        self.docstatus == Some(1)
    }
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).ok()
}

/// Response of a delete request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// `"ok"` on success.
    pub message: String,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Ordering for list queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub order: SortOrder,
}

impl OrderBy {
    /// Ascending on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    /// Descending on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }

    /// The `order_by` query value, e.g. `creation desc`.
    pub fn to_param(&self) -> String {
        format!("{} {}", self.field, self.order.as_str())
    }
}

/// Arguments for list queries.
///
/// Every field is optional; `as_dict` defaults to `true`.
///
/// # Example
///
/// ```rust,ignore
/// let args = GetDocListArgs::new()
///     .fields(["name", "title"])
///     .filter(Filter::eq("status", "Open"))
///     .order_by(OrderBy::desc("modified"))
///     .limit(20);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GetDocListArgs {
    pub fields: Option<Vec<String>>,
    pub filters: Option<Vec<Filter>>,
    pub or_filters: Option<Vec<Filter>>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<u64>,
    pub limit_start: Option<u64>,
    pub group_by: Option<String>,
    pub as_dict: bool,
}

impl Default for GetDocListArgs {
    fn default() -> Self {
        Self {
            fields: None,
            filters: None,
            or_filters: None,
            order_by: None,
            limit: None,
            limit_start: None,
            group_by: None,
            as_dict: true,
        }
    }
}

impl GetDocListArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields to return. The server returns only `name` when unset.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Add a filter; all filters must match.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.get_or_insert_with(Vec::new).push(filter);
        self
    }

    /// Replace the filter list.
    pub fn filters(mut self, filters: Vec<Filter>) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Add an alternative filter; at least one must match.
    pub fn or_filter(mut self, filter: Filter) -> Self {
        self.or_filters.get_or_insert_with(Vec::new).push(filter);
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// Page size.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Offset of the first row.
    pub fn limit_start(mut self, start: u64) -> Self {
        self.limit_start = Some(start);
        self
    }

    pub fn group_by(mut self, field: impl Into<String>) -> Self {
        self.group_by = Some(field.into());
        self
    }

    /// Return rows as objects (`true`) or as arrays of values (`false`).
    pub fn as_dict(mut self, as_dict: bool) -> Self {
        self.as_dict = as_dict;
        self
    }

    /// Query parameters for the list endpoint. Unset values are omitted;
    /// field and filter lists travel as JSON text.
    pub(crate) fn to_query(&self) -> Result<Vec<(String, String)>, serde_json::Error> {
        let mut query = Vec::new();

        if let Some(fields) = &self.fields {
            query.push(("fields".to_string(), serde_json::to_string(fields)?));
        }
        if let Some(filters) = &self.filters {
            query.push(("filters".to_string(), serde_json::to_string(filters)?));
        }
        if let Some(or_filters) = &self.or_filters {
            query.push(("or_filters".to_string(), serde_json::to_string(or_filters)?));
        }
        if let Some(order_by) = &self.order_by {
            query.push(("order_by".to_string(), order_by.to_param()));
        }
        if let Some(group_by) = &self.group_by {
            query.push(("group_by".to_string(), group_by.clone()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(limit_start) = self.limit_start {
            query.push(("limit_start".to_string(), limit_start.to_string()));
        }
        query.push(("as_dict".to_string(), self.as_dict.to_string()));

        Ok(query)
    }
}
