//! Concurrent collection of built fields.

use crossbeam_queue::SegQueue;

use crate::document::field::IndexField;

/// Append-only, multi-producer queue of index fields.
///
/// Workers evaluating computed fields push into the same queue without
/// external locking. Field order carries no meaning.
#[derive(Debug, Default)]
pub struct FieldQueue {
    fields: SegQueue<IndexField>,
}

impl FieldQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    pub fn push(&self, field: IndexField) {
        self.fields.push(field);
    }

    /// Number of queued fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no field has been queued.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Take every queued field, leaving the queue empty.
    pub fn drain(&self) -> Vec<IndexField> {
        let mut fields = Vec::with_capacity(self.fields.len());
        while let Some(field) = self.fields.pop() {
            fields.push(field);
        }
        fields
    }

    /// Consume the queue into its fields.
    pub fn into_fields(self) -> Vec<IndexField> {
        self.drain()
    }
}
