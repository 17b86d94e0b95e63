//! Field-type inference over sample documents.
//!
//! Each document is walked into a `Schema` (one descriptor per field), the
//! per-document schemas are merged left to right, and `solve` resolves the
//! string accumulators and orders the keys.
//!
//! Ownership: an `Inference` owns its in-progress tree exclusively and
//! mutates it in place; `solve` works on a copy, so observing can continue
//! afterwards.
pub mod arr;
pub mod kind;
pub mod obj;
pub mod values;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::ir::{Descriptor, Schema, TypeTag};

pub use kind::{classify, ClassifyOptions, Kind};
pub use values::ValueSet;

// ------------------------------- Policy ---------------------------------- //

/// Always `ObjectId(string)`, whatever the sample holds.
pub const OBJECT_ID_FIELD: &str = "_id";

/// A string field with exactly this many distinct values is a literal union.
pub const LITERAL_UNION_ARITY: usize = 2;

// ------------------------------ Observe ---------------------------------- //

/// Walk one object into a schema. String fields come back `Pending`.
pub fn build_object(map: &Map<String, Value>, opts: &ClassifyOptions) -> Schema {
    let mut schema = Schema::new();
    for (k, v) in map {
        let ty = if k == OBJECT_ID_FIELD {
            Descriptor::object_id()
        } else {
            observe_field(v, opts)
        };
        schema.insert(k.clone(), ty);
    }
    schema
}

fn observe_field(v: &Value, opts: &ClassifyOptions) -> Descriptor {
    match classify(v, opts) {
        Kind::Null => Descriptor::Primitive(TypeTag::Null),
        Kind::Bool => Descriptor::Primitive(TypeTag::Boolean),
        Kind::Number => Descriptor::Primitive(TypeTag::Number),
        Kind::Date => Descriptor::Primitive(TypeTag::Date),
        Kind::String => Descriptor::Pending(ValueSet::of(v.as_str().unwrap_or_default())),
        Kind::Array => {
            let xs = v.as_array().map(Vec::as_slice).unwrap_or_default();
            Descriptor::ArrayOf(Box::new(arr::infer_array(xs, opts)))
        }
        Kind::Object => {
            Descriptor::Nested(v.as_object().map(|m| build_object(m, opts)).unwrap_or_default())
        }
    }
}

// ------------------------------- Front API -------------------------------- //

#[derive(Debug, Default)]
pub struct Inference {
    state: Schema,
    options: ClassifyOptions,
    documents: u64,
}

impl Inference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ClassifyOptions) -> Self {
        Self { options, ..Self::default() }
    }

    /// A top-level array is a collection of documents; anything else is one
    /// document.
    pub fn observe_value(&mut self, v: &Value) {
        match v {
            Value::Array(docs) => {
                for doc in docs {
                    self.observe_document(doc);
                }
            }
            _ => self.observe_document(v),
        }
    }

    /// Non-object documents have no fields and are skipped.
    pub fn observe_document(&mut self, v: &Value) {
        let Some(map) = v.as_object() else {
            warn!(kind = ?classify(v, &self.options), "skipping non-object document");
            return;
        };
        let schema = build_object(map, &self.options);
        self.state.merge(schema);
        self.documents += 1;
    }

    /// Documents merged so far.
    pub fn documents(&self) -> u64 {
        self.documents
    }

    /// Finalized, key-sorted schema of everything observed so far.
    pub fn solve(&self) -> Schema {
        let mut schema = self.state.clone();
        crate::lower::finalize(&mut schema);
        let schema = crate::lower::sorted(&schema);
        debug!(documents = self.documents, fields = schema.len(), "solved schema");
        schema
    }
}

/// Infer from one value: a document, or an array of documents.
pub fn infer(v: &Value) -> Schema {
    infer_from_values([v])
}

pub fn infer_from_values<'a, I>(values: I) -> Schema
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut inf = Inference::new();
    for v in values {
        inf.observe_value(v);
    }
    inf.solve()
}

// ------------------------------- Tests ------------------------------------ //
