use serde_json::Value;

use super::kind::{classify, ClassifyOptions, Kind};
use crate::ir::{Descriptor, TypeTag};

/// Element type of an array field.
///
/// Arrays are taken to be homogeneous: mixed kinds, and kinds with no element
/// rule (booleans, nulls, nested arrays), fall back to `any`. Arrays of
/// objects are sampled from the first element only; later elements are not
/// merged in.
pub fn infer_array(xs: &[Value], opts: &ClassifyOptions) -> Descriptor {
    let any = Descriptor::Primitive(TypeTag::Any);
    let Some(first) = xs.first() else {
        return any;
    };

    let kind = classify(first, opts);
    if xs[1..].iter().any(|x| classify(x, opts) != kind) {
        return any;
    }

    match kind {
        Kind::String => Descriptor::Primitive(TypeTag::String),
        Kind::Number => Descriptor::Primitive(TypeTag::Number),
        Kind::Date => Descriptor::Primitive(TypeTag::Date),
        Kind::Object => match first.as_object() {
            Some(m) => Descriptor::Nested(super::build_object(m, opts)),
            None => any,
        },
        Kind::Null | Kind::Bool | Kind::Array => any,
    }
}
