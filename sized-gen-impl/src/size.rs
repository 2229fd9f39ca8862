use crate::arguments::Arguments;
use crate::error::{Error, Result};
use crate::value::{saturating_i64, Value};
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use tracing::instrument;

/// Anything that can report its element count without being consumed.
pub trait Length {
    fn length(&self) -> anyhow::Result<usize>;
}

macro_rules! impl_length {
    ($(impl<$($g:ident),*> for $t:ty;)*) => {
        $(
            impl<$($g),*> Length for $t {
                fn length(&self) -> anyhow::Result<usize> {
                    Ok(self.len())
                }
            }
        )*
    };
}

impl_length! {
    impl<T> for Vec<T>;
    impl<T> for VecDeque<T>;
    impl<T> for [T];
    impl<K, V> for HashMap<K, V>;
    impl<K, V> for BTreeMap<K, V>;
    impl<K, V> for IndexMap<K, V>;
    impl<T> for HashSet<T>;
    impl<T> for BTreeSet<T>;
}

impl Length for str {
    fn length(&self) -> anyhow::Result<usize> {
        Ok(self.chars().count())
    }
}

impl Length for String {
    fn length(&self) -> anyhow::Result<usize> {
        self.as_str().length()
    }
}

impl<T, const N: usize> Length for [T; N] {
    fn length(&self) -> anyhow::Result<usize> {
        Ok(N)
    }
}

impl<L: Length + ?Sized> Length for &L {
    fn length(&self) -> anyhow::Result<usize> {
        (**self).length()
    }
}

impl Length for Value {
    fn length(&self) -> anyhow::Result<usize> {
        self.len()
            .ok_or_else(|| anyhow::anyhow!("{} has no length", self.type_name()))
    }
}

type SizeFn = dyn Fn(&Arguments) -> Value + Send + Sync;

/// How the size of a sized generator is obtained.
#[derive(Clone)]
pub enum SizeSpec {
    /// A constant count. Negative counts are accepted and read as already exhausted.
    Fixed(i64),
    /// The length of an object that already knows it.
    Len(Arc<dyn Length + Send + Sync>),
    /// A dynamic value: an `Int` count or a length-queryable value.
    Value(Value),
    /// Derived from the arguments of the call that produced the generator.
    Derived(Arc<SizeFn>),
}

impl SizeSpec {
    /// Size taken from the length of `sized`, queried once per call.
    pub fn of<L>(sized: L) -> Self
    where
        L: Length + Send + Sync + 'static,
    {
        SizeSpec::Len(Arc::new(sized))
    }

    /// Size derived from the arguments of each call. The function may return a
    /// count or any length-queryable [`Value`].
    pub fn derived<F, V>(f: F) -> Self
    where
        F: Fn(&Arguments) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        SizeSpec::Derived(Arc::new(move |args: &Arguments| f(args).into()))
    }

    pub fn is_derived(&self) -> bool {
        matches!(self, SizeSpec::Derived(_))
    }
}

impl fmt::Debug for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeSpec::Fixed(n) => f.debug_tuple("Fixed").field(n).finish(),
            SizeSpec::Len(_) => f.write_str("Len(..)"),
            SizeSpec::Value(v) => f.debug_tuple("Value").field(v).finish(),
            SizeSpec::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

macro_rules! impl_from_count {
    ($($t:ty),*) => {
        $(
            impl From<$t> for SizeSpec {
                fn from(n: $t) -> Self {
                    SizeSpec::Fixed(saturating_i64(n))
                }
            }
        )*
    };
}

impl_from_count!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl From<Value> for SizeSpec {
    fn from(v: Value) -> Self {
        SizeSpec::Value(v)
    }
}

impl<T: Send + Sync + 'static> From<Vec<T>> for SizeSpec {
    fn from(items: Vec<T>) -> Self {
        SizeSpec::of(items)
    }
}

/// Normalizes a count or a length-queryable value into a size.
fn size_of_value(value: &Value) -> Option<i64> {
    match value {
        Value::Int(n) => Some(*n),
        other => other.len().map(saturating_i64),
    }
}

fn query_length(sized: &(dyn Length + Send + Sync)) -> Result<i64> {
    sized.length().map(saturating_i64).map_err(Error::Length)
}

/// Resolves `spec` into a size, calling a size function with `arguments`.
#[instrument(level = "trace", skip(arguments))]
pub fn resolve(spec: &SizeSpec, arguments: &Arguments) -> Result<i64> {
    match spec {
        SizeSpec::Fixed(n) => Ok(*n),
        SizeSpec::Len(sized) => query_length(&**sized),
        SizeSpec::Value(value) => {
            size_of_value(value).ok_or_else(|| Error::InvalidSizeSpecification {
                value: value.to_string(),
                type_name: value.type_name(),
            })
        }
        SizeSpec::Derived(f) => {
            let value = f(arguments);
            size_of_value(&value).ok_or_else(|| Error::InvalidSizeSpecification {
                value: value.to_string(),
                type_name: value.type_name(),
            })
        }
    }
}

/// Resolves a spec that must not depend on call arguments.
///
/// Size functions are rejected with [`Error::InvalidSize`]: they have to be
/// resolved against a call before a generator can be built.
pub fn resolve_fixed(spec: &SizeSpec) -> Result<i64> {
    match spec {
        SizeSpec::Fixed(n) => Ok(*n),
        SizeSpec::Len(sized) => query_length(&**sized),
        SizeSpec::Value(value) => size_of_value(value).ok_or_else(|| Error::InvalidSize {
            value: value.to_string(),
            type_name: value.type_name(),
        }),
        SizeSpec::Derived(_) => Err(Error::InvalidSize {
            value: "<size function>".to_owned(),
            type_name: "function",
        }),
    }
}
