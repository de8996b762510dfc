//! Conversions between raw query parameters and typed values.
//!
//! A [`Serializer`] pairs a `parse` function (raw value to `T`) with a
//! `serialize` function (`T` to raw value). Both are stored behind [`Arc`]s so
//! that a synchronizer can tell whether the caller handed it the same
//! functions as on the previous render.

use std::sync::{Arc, LazyLock};

use query_state_models::RawValue;

/// Converts a possibly absent raw parameter into a typed value.
///
/// Must return a default value for `None` instead of failing.
pub type ParseFn<T> = Arc<dyn Fn(Option<&RawValue>) -> T + Send + Sync>;

/// Converts a typed value back into a raw parameter.
///
/// `None` means the value has no raw representation.
pub type SerializeFn<T> = Arc<dyn Fn(&T) -> Option<RawValue> + Send + Sync>;

/// A `parse`/`serialize` pair for one query parameter.
pub struct Serializer<T> {
    parse: ParseFn<T>,
    serialize: SerializeFn<T>,
}

impl<T> Clone for Serializer<T> {
    fn clone(&self) -> Self {
        Self {
            parse: self.parse.clone(),
            serialize: self.serialize.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Serializer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Serializer")
            .field("parse", &identity(&self.parse))
            .field("serialize", &identity(&self.serialize))
            .finish()
    }
}

impl<T> Serializer<T> {
    pub fn new(
        parse: impl Fn(Option<&RawValue>) -> T + Send + Sync + 'static,
        serialize: impl Fn(&T) -> Option<RawValue> + Send + Sync + 'static,
    ) -> Self {
        Self {
            parse: Arc::new(parse),
            serialize: Arc::new(serialize),
        }
    }

    /// Builds a serializer from already shared functions, keeping their
    /// identity.
    #[must_use]
    pub const fn from_fns(parse: ParseFn<T>, serialize: SerializeFn<T>) -> Self {
        Self { parse, serialize }
    }

    pub fn parse(&self, raw: Option<&RawValue>) -> T {
        (self.parse)(raw)
    }

    pub fn serialize(&self, value: &T) -> Option<RawValue> {
        (self.serialize)(value)
    }

    #[must_use]
    pub const fn parse_fn(&self) -> &ParseFn<T> {
        &self.parse
    }

    #[must_use]
    pub const fn serialize_fn(&self) -> &SerializeFn<T> {
        &self.serialize
    }

    /// Identity of the `parse` function.
    #[must_use]
    pub fn parse_identity(&self) -> usize {
        identity(&self.parse)
    }

    /// Identity of the `serialize` function.
    #[must_use]
    pub fn serialize_identity(&self) -> usize {
        identity(&self.serialize)
    }
}

fn parse_raw(raw: Option<&RawValue>) -> Option<RawValue> {
    raw.cloned()
}

#[allow(clippy::ref_option)]
fn serialize_raw(value: &Option<RawValue>) -> Option<RawValue> {
    value.clone()
}

static DEFAULT_SERIALIZER: LazyLock<Serializer<Option<RawValue>>> =
    LazyLock::new(|| Serializer::new(parse_raw, serialize_raw));

impl Serializer<Option<RawValue>> {
    /// The passthrough serializer used when a parameter declares none.
    ///
    /// Every call returns the same functions, so its identity never changes.
    #[must_use]
    pub fn raw() -> Self {
        DEFAULT_SERIALIZER.clone()
    }
}

impl Default for Serializer<Option<RawValue>> {
    fn default() -> Self {
        Self::raw()
    }
}

/// Shorthand for [`Serializer::raw`].
#[must_use]
pub fn default_serializer() -> Serializer<Option<RawValue>> {
    Serializer::raw()
}

pub(crate) fn identity<F: ?Sized>(f: &Arc<F>) -> usize {
    Arc::as_ptr(f).cast::<()>() as usize
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn integer() -> Serializer<Option<i64>> {
        Serializer::new(
            |raw| raw.and_then(|value| value.first()).and_then(|v| v.parse().ok()),
            |value: &Option<i64>| value.map(|v| RawValue::from(v.to_string())),
        )
    }

    #[test_log::test]
    fn raw_serializer_treats_absent_as_none() {
        let serializer = Serializer::raw();
        assert_eq!(serializer.parse(None), None);
        assert_eq!(
            serializer.parse(Some(&RawValue::from("a"))),
            Some(RawValue::from("a"))
        );
    }

    #[test_log::test]
    fn raw_serializer_is_identity() {
        let serializer = default_serializer();
        let values = [
            None,
            Some(RawValue::from("a")),
            Some(RawValue::from(vec!["a", "b"])),
        ];
        for value in values {
            assert_eq!(serializer.serialize(&value), value);
        }
    }

    #[test_log::test]
    fn raw_serializer_identity_is_stable() {
        let a = Serializer::raw();
        let b = Serializer::default();
        assert_eq!(a.parse_identity(), b.parse_identity());
        assert_eq!(a.serialize_identity(), b.serialize_identity());
    }

    #[test_log::test]
    fn new_serializers_have_distinct_identities() {
        let a = integer();
        let b = integer();
        assert_ne!(a.parse_identity(), b.parse_identity());
        assert_eq!(a.parse_identity(), a.clone().parse_identity());
    }

    #[test_log::test]
    fn integer_round_trip() {
        let serializer = integer();
        for n in [0, 1, -1, 42, 9_007_199_254_740_991, -9_007_199_254_740_991] {
            let raw = serializer.serialize(&Some(n));
            assert_eq!(serializer.parse(raw.as_ref()), Some(n));
        }
    }
}
