//! In-process evaluation of filter and update expressions.
//!
//! Expressions are compiled once up front so malformed ones are rejected
//! even when the collection is empty, the same way the real store rejects
//! them before touching any data. Only top-level fields are addressed; a
//! dotted key is treated as a literal field name.

use std::cmp::Ordering;

use bson::{Bson, Document};

use super::StoreError;

/// A compiled filter expression.
#[derive(Debug, Clone)]
pub(crate) enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Nor(Vec<Filter>),
    Field { name: String, conditions: Vec<Condition> },
}

#[derive(Debug, Clone)]
pub(crate) enum Condition {
    Eq(Bson),
    Ne(Bson),
    Cmp(CmpOp, Bson),
    In(Vec<Bson>),
    Nin(Vec<Bson>),
    Exists(bool),
    Not(Vec<Condition>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CmpOp {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CmpOp {
    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            CmpOp::Gt => ordering == Ordering::Greater,
            CmpOp::Gte => ordering != Ordering::Less,
            CmpOp::Lt => ordering == Ordering::Less,
            CmpOp::Lte => ordering != Ordering::Greater,
        }
    }
}

fn query_error(msg: impl Into<String>) -> StoreError {
    StoreError::Query(msg.into())
}

impl Filter {
    pub(crate) fn compile(filter: &Document) -> Result<Self, StoreError> {
        let mut clauses = Vec::with_capacity(filter.len());
        for (key, value) in filter {
            let clause = match key.as_str() {
                "$and" => Filter::And(compile_branches(key, value)?),
                "$or" => Filter::Or(compile_branches(key, value)?),
                "$nor" => Filter::Nor(compile_branches(key, value)?),
                op if op.starts_with('$') => {
                    return Err(query_error(format!("unknown top level operator: {op}")))
                }
                name => Filter::Field {
                    name: name.to_string(),
                    conditions: compile_conditions(value)?,
                },
            };
            clauses.push(clause);
        }
        Ok(Filter::And(clauses))
    }

    pub(crate) fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::And(clauses) => clauses.iter().all(|c| c.matches(doc)),
            Filter::Or(clauses) => clauses.iter().any(|c| c.matches(doc)),
            Filter::Nor(clauses) => !clauses.iter().any(|c| c.matches(doc)),
            Filter::Field { name, conditions } => {
                let value = doc.get(name);
                conditions.iter().all(|c| c.matches(value))
            }
        }
    }
}

fn compile_branches(op: &str, value: &Bson) -> Result<Vec<Filter>, StoreError> {
    let branches = match value {
        Bson::Array(items) if !items.is_empty() => items,
        _ => return Err(query_error(format!("{op} must be a nonempty array"))),
    };
    branches
        .iter()
        .map(|branch| match branch {
            Bson::Document(doc) => Filter::compile(doc),
            _ => Err(query_error(format!("{op} argument's entries must be objects"))),
        })
        .collect()
}

fn is_operator_document(value: &Bson) -> Option<&Document> {
    match value {
        Bson::Document(doc) if doc.keys().next().is_some_and(|k| k.starts_with('$')) => Some(doc),
        _ => None,
    }
}

fn compile_conditions(value: &Bson) -> Result<Vec<Condition>, StoreError> {
    let Some(ops) = is_operator_document(value) else {
        return Ok(vec![Condition::Eq(value.clone())]);
    };
    ops.iter().map(|(op, arg)| compile_operator(op, arg)).collect()
}

fn compile_operator(op: &str, arg: &Bson) -> Result<Condition, StoreError> {
    let condition = match op {
        "$eq" => Condition::Eq(arg.clone()),
        "$ne" => Condition::Ne(arg.clone()),
        "$gt" => Condition::Cmp(CmpOp::Gt, arg.clone()),
        "$gte" => Condition::Cmp(CmpOp::Gte, arg.clone()),
        "$lt" => Condition::Cmp(CmpOp::Lt, arg.clone()),
        "$lte" => Condition::Cmp(CmpOp::Lte, arg.clone()),
        "$in" => Condition::In(array_arg(op, arg)?),
        "$nin" => Condition::Nin(array_arg(op, arg)?),
        "$exists" => Condition::Exists(truthy(arg)),
        "$not" => match is_operator_document(arg) {
            Some(inner) => Condition::Not(
                inner
                    .iter()
                    .map(|(op, arg)| compile_operator(op, arg))
                    .collect::<Result<_, _>>()?,
            ),
            None => return Err(query_error("$not needs a document")),
        },
        other => return Err(query_error(format!("unknown operator: {other}"))),
    };
    Ok(condition)
}

fn array_arg(op: &str, arg: &Bson) -> Result<Vec<Bson>, StoreError> {
    match arg {
        Bson::Array(items) => Ok(items.clone()),
        _ => Err(query_error(format!("{op} needs an array"))),
    }
}

fn truthy(value: &Bson) -> bool {
    match value {
        Bson::Boolean(b) => *b,
        Bson::Null | Bson::Undefined => false,
        other => as_f64(other).map_or(true, |n| n != 0.0),
    }
}

impl Condition {
    fn matches(&self, value: Option<&Bson>) -> bool {
        match self {
            Condition::Eq(expected) => equals(value, expected),
            Condition::Ne(expected) => !equals(value, expected),
            Condition::Cmp(op, bound) => {
                any_element(value, |v| compare(v, bound).is_some_and(|o| op.accepts(o)))
            }
            Condition::In(options) => options.iter().any(|o| equals(value, o)),
            Condition::Nin(options) => !options.iter().any(|o| equals(value, o)),
            Condition::Exists(wanted) => value.is_some() == *wanted,
            Condition::Not(inner) => !inner.iter().all(|c| c.matches(value)),
        }
    }
}

/// Equality as the store defines it: a missing field equals null, and an
/// array field matches when the whole array or any element is equal.
fn equals(value: Option<&Bson>, expected: &Bson) -> bool {
    match value {
        None => matches!(expected, Bson::Null),
        Some(v) => values_equal(v, expected) || any_element(Some(v), |e| values_equal(e, expected)),
    }
}

fn any_element(value: Option<&Bson>, pred: impl Fn(&Bson) -> bool) -> bool {
    match value {
        Some(Bson::Array(items)) => items.iter().any(&pred),
        Some(v) => pred(v),
        None => false,
    }
}

fn values_equal(a: &Bson, b: &Bson) -> bool {
    if let (Some(x), Some(y)) = (as_i64(a), as_i64(b)) {
        return x == y;
    }
    match (as_f64(a), as_f64(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Ordering between values of the same type class; `None` across classes.
fn compare(a: &Bson, b: &Bson) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_i64(a), as_i64(b)) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (as_f64(a), as_f64(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::DateTime(x), Bson::DateTime(y)) => {
            Some(x.timestamp_millis().cmp(&y.timestamp_millis()))
        }
        (Bson::ObjectId(x), Bson::ObjectId(y)) => Some(x.bytes().cmp(&y.bytes())),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Integer types only, so large Int64 values are never rounded.
fn as_i64(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(n) => Some(i64::from(*n)),
        Bson::Int64(n) => Some(*n),
        _ => None,
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

/// A compiled update expression.
#[derive(Debug, Clone)]
pub(crate) struct Update {
    ops: Vec<UpdateOp>,
}

#[derive(Debug, Clone)]
enum UpdateOp {
    Set(String, Bson),
    Unset(String),
    Inc(String, Bson),
}

impl Update {
    pub(crate) fn compile(update: &Document) -> Result<Self, StoreError> {
        if update.is_empty() {
            return Err(query_error("update document requires atomic operators"));
        }
        let mut ops = Vec::new();
        for (op, arg) in update {
            if !op.starts_with('$') {
                return Err(query_error("update document requires atomic operators"));
            }
            let Bson::Document(fields) = arg else {
                return Err(query_error(format!(
                    "Modifiers operate on fields but we found a non-document argument for {op}"
                )));
            };
            for (field, value) in fields {
                if field == "_id" {
                    return Err(query_error(
                        "Performing an update on the path '_id' would modify the immutable field '_id'",
                    ));
                }
                let compiled = match op.as_str() {
                    "$set" => UpdateOp::Set(field.clone(), value.clone()),
                    "$unset" => UpdateOp::Unset(field.clone()),
                    "$inc" => {
                        if as_f64(value).is_none() {
                            return Err(query_error(format!(
                                "Cannot increment with non-numeric argument: {{{field}: {value}}}"
                            )));
                        }
                        UpdateOp::Inc(field.clone(), value.clone())
                    }
                    other => {
                        return Err(query_error(format!("Unknown modifier: {other}")));
                    }
                };
                ops.push(compiled);
            }
        }
        Ok(Self { ops })
    }

    /// Apply every operator to a copy of `doc`.
    pub(crate) fn apply(&self, doc: &Document) -> Result<Document, StoreError> {
        let mut next = doc.clone();
        for op in &self.ops {
            match op {
                UpdateOp::Set(field, value) => {
                    next.insert(field.clone(), value.clone());
                }
                UpdateOp::Unset(field) => {
                    next.remove(field);
                }
                UpdateOp::Inc(field, delta) => {
                    let sum = match next.get(field) {
                        None => delta.clone(),
                        Some(current) => {
                            let id = doc.get("_id").map(Bson::to_string).unwrap_or_default();
                            add(current, delta).map_err(|err| match err {
                                IncError::NonNumeric => query_error(format!(
                                    "Cannot apply $inc to a value of non-numeric type. {{_id: {id}}} has the field '{field}' of non-numeric type {:?}",
                                    current.element_type()
                                )),
                                IncError::Overflow => query_error(format!(
                                    "Failed to apply $inc operations to current value ({current}) for document {{_id: {id}}}: integer overflow"
                                )),
                            })?
                        }
                    };
                    next.insert(field.clone(), sum);
                }
            }
        }
        Ok(next)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IncError {
    NonNumeric,
    Overflow,
}

/// Numeric addition with the store's type widening rules.
fn add(a: &Bson, b: &Bson) -> Result<Bson, IncError> {
    let sum = match (a, b) {
        (Bson::Int32(x), Bson::Int32(y)) => match x.checked_add(*y) {
            Some(n) => Bson::Int32(n),
            None => Bson::Int64(i64::from(*x) + i64::from(*y)),
        },
        (Bson::Int32(_) | Bson::Int64(_), Bson::Int32(_) | Bson::Int64(_)) => {
            let (x, y) = (as_i64(a), as_i64(b));
            let sum = x.zip(y).and_then(|(x, y)| x.checked_add(y));
            Bson::Int64(sum.ok_or(IncError::Overflow)?)
        }
        _ => match (as_f64(a), as_f64(b)) {
            (Some(x), Some(y)) => Bson::Double(x + y),
            _ => return Err(IncError::NonNumeric),
        },
    };
    Ok(sum)
}
