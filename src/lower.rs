// Lowering from observed evidence to the canonical schema: resolve string
// accumulators, then order keys.

use std::cmp::Ordering;

use unicode_normalization::char::{decompose_canonical, is_combining_mark};

use crate::ir::{Descriptor, Schema};

/// Replace every `Pending` accumulator in place. Recurses into nested objects
/// and array elements. Running it on a finalized tree changes nothing.
pub fn finalize(schema: &mut Schema) {
    for ty in schema.fields.values_mut() {
        finalize_descriptor(ty);
    }
}

fn finalize_descriptor(ty: &mut Descriptor) {
    match ty {
        Descriptor::Pending(values) => {
            let resolved = values.resolve();
            *ty = resolved;
        }
        Descriptor::Nested(schema) => finalize(schema),
        Descriptor::ArrayOf(elem) => finalize_descriptor(elem),
        Descriptor::Primitive(_) | Descriptor::Union(_) => {}
    }
}

/// Copy of `schema` with keys in `locale_cmp` order at every level,
/// including object elements of arrays.
pub fn sorted(schema: &Schema) -> Schema {
    let mut entries: Vec<(&String, &Descriptor)> = schema.iter().collect();
    entries.sort_by(|(a, _), (b, _)| locale_cmp(a, b));
    Schema {
        fields: entries
            .into_iter()
            .map(|(k, ty)| (k.clone(), sorted_descriptor(ty)))
            .collect(),
    }
}

fn sorted_descriptor(ty: &Descriptor) -> Descriptor {
    match ty {
        Descriptor::Nested(schema) => Descriptor::Nested(sorted(schema)),
        Descriptor::ArrayOf(elem) => Descriptor::ArrayOf(Box::new(sorted_descriptor(elem))),
        other => other.clone(),
    }
}

// ------------------------------ Collation --------------------------------- //

/// Root-locale punctuation and symbol order. Anything not listed ranks after
/// these, by code point.
const PUNCTUATION_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Locale-style key order, compared level by level over the whole key:
/// 1. base characters: whitespace, punctuation, digits, then letters with
///    case and diacritics folded away;
/// 2. diacritics, so `e` < `é` < `f`;
/// 3. case, lowercase first;
/// 4. raw code points for whatever is left.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    primary(a)
        .cmp(primary(b))
        .then_with(|| a.chars().map(|c| fold(c).1).cmp(b.chars().map(|c| fold(c).1)))
        .then_with(|| a.chars().map(char::is_uppercase).cmp(b.chars().map(char::is_uppercase)))
        .then_with(|| a.cmp(b))
}

fn primary(s: &str) -> impl Iterator<Item = (u8, u32)> + '_ {
    s.chars().map(|c| {
        if c.is_whitespace() {
            (0, c as u32)
        } else if c.is_numeric() {
            (2, c as u32)
        } else if c.is_alphabetic() {
            let (base, _) = fold(c);
            (3, base.to_lowercase().next().unwrap_or(base) as u32)
        } else {
            let rank = match PUNCTUATION_ORDER.find(c) {
                Some(index) => index as u32,
                None => PUNCTUATION_ORDER.len() as u32 + c as u32,
            };
            (1, rank)
        }
    })
}

/// Canonical decomposition of `c` into its base character and the first
/// combining mark (0 when unaccented).
fn fold(c: char) -> (char, u32) {
    let mut base = None;
    let mut mark = 0;
    decompose_canonical(c, |d| {
        if is_combining_mark(d) {
            if mark == 0 {
                mark = d as u32;
            }
        } else if base.is_none() {
            base = Some(d);
        }
    });
    (base.unwrap_or(c), mark)
}
