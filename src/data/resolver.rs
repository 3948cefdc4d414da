//! Dotted field-path resolution
//!
//! A field path such as `Education.Bachelor's Degree or Higher` mixes two
//! kinds of hop in one expression: a named attribute group of the record and
//! a labeled entry inside that group. Resolution walks the segments against
//! a small polymorphic value so both shapes go through the same interface.

use super::{CountyRecord, FieldGroup};

/// The value reached at an intermediate step of a path walk.
#[derive(Debug, Clone, Copy)]
enum FieldValue<'a> {
    Record(&'a CountyRecord),
    Group(&'a FieldGroup),
    Number(f64),
}

/// Resolve a dotted path (already split into segments) against a record.
///
/// Group names match ASCII-case-insensitively; labels inside a group match
/// exactly. Returns `None` for any dangling path: a missing group or label,
/// a segment applied to a leaf number, or a path that stops short of a
/// numeric leaf. Never panics.
pub fn resolve_field(record: &CountyRecord, segments: &[&str]) -> Option<f64> {
    let mut current = FieldValue::Record(record);

    for segment in segments {
        current = match current {
            FieldValue::Group(group) => FieldValue::Number(*group.get(*segment)?),
            FieldValue::Record(rec) => FieldValue::Group(rec.group(segment)?),
            FieldValue::Number(_) => return None,
        };
    }

    match current {
        FieldValue::Number(value) => Some(value),
        _ => None,
    }
}
