use serde_json::Value;

use super::condition::{Condition, SortKeyCondition};
use super::cursor;
use super::normalize::title_case;
use super::{EntitySchema, FilterField, FilterKind, FilterValue, Filters, PlanError};
use crate::storage::{Item, Key, KeyPart, QueryRequest, ScanRequest};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 16;
/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// The access path chosen for a request, most to least selective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    PointLookup,
    RangeQuery,
    FullScan,
}

/// A single store operation, ready to hand to a [`crate::storage::DocumentStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Fetch by full primary key; `filter` is applied to the fetched item.
    GetItem {
        key: Key,
        filter: Option<Condition>,
    },
    Query(QueryRequest),
    Scan(ScanRequest),
}

/// Caller-supplied continuation token and page size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

impl Pagination {
    pub fn new(cursor: Option<String>, limit: Option<u32>) -> Self {
        Self { cursor, limit }
    }

    /// Requested page size clamped to `1..=MAX_PAGE_SIZE`.
    pub fn page_size(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// The planned operation plus the scope its cursors are bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    operation: Operation,
    scope: String,
}

impl Plan {
    pub fn strategy(&self) -> Strategy {
        match self.operation {
            Operation::GetItem { .. } => Strategy::PointLookup,
            Operation::Query(_) => Strategy::RangeQuery,
            Operation::Scan(_) => Strategy::FullScan,
        }
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// The post-filter predicate, if any.
    pub fn filter(&self) -> Option<&Condition> {
        match &self.operation {
            Operation::GetItem { filter, .. } => filter.as_ref(),
            Operation::Query(request) => request.filter.as_ref(),
            Operation::Scan(request) => request.filter.as_ref(),
        }
    }

    /// Encodes the store's continuation key as a cursor for the next page.
    pub fn next_cursor(&self, last_evaluated_key: Option<&Item>) -> Option<String> {
        match self.operation {
            Operation::GetItem { .. } => None,
            _ => last_evaluated_key.map(|key| cursor::encode(&self.scope, key)),
        }
    }
}

/// Chooses the cheapest store operation that returns exactly the filtered set.
///
/// A full primary key yields a point lookup, a partition key alone a range query
/// on that partition, anything else a scan with all filters combined by AND.
pub fn plan(
    schema: &EntitySchema,
    filters: &Filters,
    pagination: &Pagination,
) -> Result<Plan, PlanError> {
    if let Some((param, _)) = filters.iter().find(|(param, _)| !schema.accepts(param)) {
        return Err(PlanError::UnknownFilter(param.to_string()));
    }

    let partition = filters.get(schema.partition_key);
    let sort = schema
        .sort_key
        .and_then(|attr| filters.get(attr).map(|value| (attr, value)));

    if let (None, Some((sort_attr, _))) = (partition, sort) {
        return Err(PlanError::InvalidFilterCombination(format!(
            "If {sort_attr} is provided, {} must also be provided",
            schema.partition_key
        )));
    }

    let scope = cursor::scope_of(schema, filters);
    let exclusive_start_key = pagination
        .cursor
        .as_deref()
        .map(|token| cursor::decode(token, &scope))
        .transpose()?;
    let filter = Condition::all(post_filters(schema, filters)?);
    let limit = Some(pagination.page_size());

    let Some(partition) = partition else {
        return Ok(Plan {
            operation: Operation::Scan(ScanRequest {
                filter,
                limit,
                exclusive_start_key,
            }),
            scope,
        });
    };

    let partition = KeyPart::new(
        schema.partition_key,
        single_value(schema.partition_key, partition)?,
    );

    let sort = match sort {
        Some((attr, value)) => Some((attr.to_string(), sort_condition(attr, value)?)),
        None => None,
    };

    // Secondary indexes have no point lookup; an exact sort key becomes a query.
    if schema.index.is_none() && exclusive_start_key.is_none() {
        if let Some((attr, SortKeyCondition::Equals(value))) = &sort {
            let key = Key {
                partition,
                sort: Some(KeyPart::new(attr.clone(), value.clone())),
            };
            return Ok(Plan {
                operation: Operation::GetItem { key, filter },
                scope,
            });
        }
    }

    Ok(Plan {
        operation: Operation::Query(QueryRequest {
            index: schema.index.map(str::to_string),
            partition,
            sort,
            filter,
            order: schema.order,
            limit,
            exclusive_start_key,
        }),
        scope,
    })
}

fn post_filters(schema: &EntitySchema, filters: &Filters) -> Result<Vec<Condition>, PlanError> {
    let mut conditions = Vec::new();
    for (param, value) in filters.iter() {
        if schema.is_key(param) {
            continue;
        }
        if let Some(field) = schema.filter(param) {
            if let Some(condition) = predicate(field, value)? {
                conditions.push(condition);
            }
        }
    }
    Ok(conditions)
}

fn predicate(field: &FilterField, value: &FilterValue) -> Result<Option<Condition>, PlanError> {
    let attribute = field.attribute.to_string();
    let condition = match (field.kind, value) {
        (FilterKind::Equals, FilterValue::Exact(v)) => Some(Condition::Equals {
            attribute,
            value: v.clone(),
        }),
        (FilterKind::Equals | FilterKind::OneOf, FilterValue::AnyOf(values)) => {
            if values.is_empty() {
                None
            } else {
                Some(Condition::OneOf {
                    attribute,
                    values: values.clone(),
                })
            }
        }
        (FilterKind::Equals, FilterValue::Range { from, to }) => {
            let mut bounds = Vec::new();
            if let Some(from) = from {
                bounds.push(Condition::AtLeast {
                    attribute: attribute.clone(),
                    value: from.clone(),
                });
            }
            if let Some(to) = to {
                bounds.push(Condition::AtMost {
                    attribute,
                    value: to.clone(),
                });
            }
            Condition::all(bounds)
        }
        (FilterKind::AtMost, FilterValue::Exact(v))
        | (FilterKind::AtMost, FilterValue::Range { from: None, to: Some(v) }) => {
            Some(Condition::AtMost {
                attribute,
                value: number(field.param, v)?,
            })
        }
        (FilterKind::InStock, FilterValue::Exact(v)) => {
            if in_stock(field.param, v)? {
                Some(Condition::GreaterThan {
                    attribute,
                    value: Value::from(0),
                })
            } else {
                None
            }
        }
        (FilterKind::OneOf, FilterValue::Exact(v)) => Some(Condition::OneOf {
            attribute,
            values: vec![v.clone()],
        }),
        (FilterKind::Search, FilterValue::Exact(Value::String(text))) => {
            let normalized = title_case(text);
            if normalized.is_empty() {
                return Err(PlanError::invalid_value(field.param, "must not be blank"));
            }
            Some(Condition::Contains {
                attribute,
                value: normalized,
            })
        }
        _ => {
            return Err(PlanError::invalid_value(
                field.param,
                "unsupported value for this filter",
            ))
        }
    };
    Ok(condition)
}

fn single_value(param: &str, value: &FilterValue) -> Result<Value, PlanError> {
    match value {
        FilterValue::Exact(v) => Ok(v.clone()),
        _ => Err(PlanError::invalid_value(param, "must be a single value")),
    }
}

fn sort_condition(param: &str, value: &FilterValue) -> Result<SortKeyCondition, PlanError> {
    match value {
        FilterValue::Exact(v) => Ok(SortKeyCondition::Equals(v.clone())),
        FilterValue::Range {
            from: Some(from),
            to: Some(to),
        } => Ok(SortKeyCondition::Between(from.clone(), to.clone())),
        FilterValue::Range {
            from: Some(from),
            to: None,
        } => Ok(SortKeyCondition::AtLeast(from.clone())),
        FilterValue::Range {
            from: None,
            to: Some(to),
        } => Ok(SortKeyCondition::AtMost(to.clone())),
        _ => Err(PlanError::invalid_value(param, "must be a value or a range")),
    }
}

fn number(param: &str, value: &Value) -> Result<Value, PlanError> {
    match value {
        Value::Number(_) => Ok(value.clone()),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Value::from)
            .ok_or_else(|| PlanError::invalid_value(param, "expected a number")),
        _ => Err(PlanError::invalid_value(param, "expected a number")),
    }
}

fn in_stock(param: &str, value: &Value) -> Result<bool, PlanError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim() {
            "true" | "in-stock" => Ok(true),
            "false" | "" => Ok(false),
            _ => Err(PlanError::invalid_value(param, "expected true or false")),
        },
        _ => Err(PlanError::invalid_value(param, "expected true or false")),
    }
}
