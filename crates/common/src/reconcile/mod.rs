//! Reconciliation of stored form sections against cached suggestions
//!
//! A cache is a flat object of field id to value, typically filled by the
//! field mapper. Stored sections are either a single record (object) or a
//! table of records (array of objects).
//!
//! - Empty stored fields are filled from the cache.
//! - Non-empty stored fields that differ from the cache become suggestions,
//!   which can be applied one at a time or all at once, and undone.
//! - Table entries are diffed by plain equality.

use crate::errors::{AppError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A flat record of field id to value
pub type Record = Map<String, Value>;

/// A field is empty when it is missing, null or an empty string
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// A cached value that differs from what is stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub field: String,
    pub current: Value,
    pub suggested: Value,
}

/// Result of reconciling one record against the cache
#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldReconciliation {
    /// The record with empty fields filled in
    pub form: Record,
    /// Field ids that were filled
    pub filled: Vec<String>,
    pub suggestions: Vec<Suggestion>,
}

/// Classify each cached field against `existing`
pub fn suggest_fields(existing: &Record, cache: &Record) -> FieldReconciliation {
    let mut result = FieldReconciliation {
        form: existing.clone(),
        ..Default::default()
    };

    for (field, cached) in cache {
        if is_empty(Some(cached)) {
            continue;
        }

        let current = existing.get(field);
        if is_empty(current) {
            result.form.insert(field.clone(), cached.clone());
            result.filled.push(field.clone());
        } else if let Some(current) = current.filter(|c| *c != cached) {
            result.suggestions.push(Suggestion {
                field: field.clone(),
                current: current.clone(),
                suggested: cached.clone(),
            });
        }
    }

    result
}

/// Origin of a table entry after diffing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrigin {
    Existing,
    Suggested,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedEntry {
    pub origin: EntryOrigin,
    pub entry: Value,
}

/// Stored entries first, in order, then cached entries not already stored
pub fn diff_entries(existing: &[Value], cached: &[Value]) -> Vec<TaggedEntry> {
    let mut entries: Vec<TaggedEntry> = existing
        .iter()
        .map(|entry| TaggedEntry {
            origin: EntryOrigin::Existing,
            entry: entry.clone(),
        })
        .collect();

    entries.extend(
        cached
            .iter()
            .filter(|candidate| !existing.contains(candidate))
            .map(|entry| TaggedEntry {
                origin: EntryOrigin::Suggested,
                entry: entry.clone(),
            }),
    );

    entries
}

/// Pending suggestions for one record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Suggestions {
    pending: BTreeMap<String, Value>,
}

impl Suggestions {
    pub fn from_list(list: &[Suggestion]) -> Self {
        Self {
            pending: list
                .iter()
                .map(|s| (s.field.clone(), s.suggested.clone()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.pending.get(field)
    }

    /// Write one suggestion into `form` and drop it. Returns false if none was pending.
    pub fn apply(&mut self, form: &mut Record, field: &str) -> bool {
        match self.pending.remove(field) {
            Some(value) => {
                form.insert(field.to_string(), value);
                true
            }
            None => false,
        }
    }

    pub fn apply_all(&mut self, form: &mut Record) {
        for (field, value) in std::mem::take(&mut self.pending) {
            form.insert(field, value);
        }
    }

    /// Restore the cached value for `field` as a pending suggestion
    pub fn undo(&mut self, cache: &Record, field: &str) -> bool {
        match cache.get(field) {
            Some(value) if !is_empty(Some(value)) => {
                self.pending.insert(field.to_string(), value.clone());
                true
            }
            _ => false,
        }
    }
}

/// Copy every non-empty value of `rows` into the cache.
/// An empty `fields` slice means every field.
pub fn remember(cache: &mut Record, rows: &[Value], fields: &[&str]) {
    for row in rows.iter().filter_map(Value::as_object) {
        for (field, value) in row {
            if !fields.is_empty() && !fields.contains(&field.as_str()) {
                continue;
            }
            if !is_empty(Some(value)) {
                cache.insert(field.clone(), value.clone());
            }
        }
    }
}

/// Reconciliation of a whole stored section
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reconciliation {
    /// Single record against a cached record
    Fields(FieldReconciliation),
    /// Table against a cached table
    Entries {
        entries: Vec<TaggedEntry>,
        suggested: usize,
    },
    /// Table whose rows are each reconciled against a cached record
    Rows { rows: Vec<RowReconciliation> },
}

/// One stored table row reconciled against a cached record
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RowReconciliation {
    Record(FieldReconciliation),
    /// Not a record; kept as stored
    Unchanged(Value),
}

impl Reconciliation {
    /// Number of pending suggestions
    pub fn suggestion_count(&self) -> usize {
        match self {
            Reconciliation::Fields(fields) => fields.suggestions.len(),
            Reconciliation::Entries { suggested, .. } => *suggested,
            Reconciliation::Rows { rows } => rows
                .iter()
                .map(|row| match row {
                    RowReconciliation::Record(fields) => fields.suggestions.len(),
                    RowReconciliation::Unchanged(_) => 0,
                })
                .sum(),
        }
    }

    /// The section with every fill, suggestion and suggested entry accepted
    pub fn merged(&self) -> Value {
        fn accept(fields: &FieldReconciliation) -> Value {
            let mut form = fields.form.clone();
            Suggestions::from_list(&fields.suggestions).apply_all(&mut form);
            Value::Object(form)
        }

        match self {
            Reconciliation::Fields(fields) => accept(fields),
            Reconciliation::Entries { entries, .. } => {
                Value::Array(entries.iter().map(|e| e.entry.clone()).collect())
            }
            Reconciliation::Rows { rows } => Value::Array(
                rows.iter()
                    .map(|row| match row {
                        RowReconciliation::Record(fields) => accept(fields),
                        RowReconciliation::Unchanged(value) => value.clone(),
                    })
                    .collect(),
            ),
        }
    }
}

/// Restrict an object cache to `fields`. Table caches pass through untouched.
pub fn scope(cache: &Value, fields: &[&str]) -> Value {
    match cache {
        Value::Object(record) => Value::Object(
            record
                .iter()
                .filter(|(field, _)| fields.contains(&field.as_str()))
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Reconcile a stored section (`null` if never saved) against a cache value
pub fn reconcile(existing: &Value, cache: &Value) -> Result<Reconciliation> {
    let empty_record = Record::new();

    match (existing, cache) {
        (Value::Object(stored), Value::Object(cached)) => {
            Ok(Reconciliation::Fields(suggest_fields(stored, cached)))
        }
        (Value::Null, Value::Object(cached)) => {
            Ok(Reconciliation::Fields(suggest_fields(&empty_record, cached)))
        }
        (Value::Array(stored), Value::Array(cached)) => {
            let entries = diff_entries(stored, cached);
            let suggested = entries
                .iter()
                .filter(|e| e.origin == EntryOrigin::Suggested)
                .count();
            Ok(Reconciliation::Entries { entries, suggested })
        }
        (Value::Null, Value::Array(cached)) => {
            let entries = diff_entries(&[], cached);
            let suggested = entries.len();
            Ok(Reconciliation::Entries { entries, suggested })
        }
        (Value::Array(stored), Value::Object(cached)) => {
            let rows = stored
                .iter()
                .map(|row| match row {
                    Value::Object(record) => RowReconciliation::Record(suggest_fields(record, cached)),
                    other => RowReconciliation::Unchanged(other.clone()),
                })
                .collect();
            Ok(Reconciliation::Rows { rows })
        }
        _ => Err(AppError::validation(
            "cache must be an object or an array matching the stored section",
        )),
    }
}
