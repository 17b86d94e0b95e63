use tracing::debug;

use crate::ir::{Descriptor, Schema};

impl Schema {
    /// Fold `source` into `self`, field by field.
    ///
    /// - new fields are taken as-is
    /// - nested objects merge recursively
    /// - string accumulators union their values
    /// - anything else: first wins, the incoming descriptor is dropped
    pub fn merge(&mut self, source: Schema) {
        for (key, incoming) in source.fields {
            match self.fields.get_mut(&key) {
                None => {
                    self.fields.insert(key, incoming);
                }
                Some(existing) => merge_field(&key, existing, incoming),
            }
        }
    }
}

fn merge_field(key: &str, existing: &mut Descriptor, incoming: Descriptor) {
    match (existing, incoming) {
        (Descriptor::Nested(target), Descriptor::Nested(source)) => target.merge(source),
        (Descriptor::Pending(target), Descriptor::Pending(source)) => target.union(source),
        (existing, incoming) => {
            if *existing != incoming {
                debug!(
                    field = key,
                    kept = existing.label(),
                    discarded = incoming.label(),
                    "conflicting field types, keeping the first"
                );
            }
        }
    }
}
