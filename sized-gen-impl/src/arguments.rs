use crate::error::{Error, Result};
use crate::value::Value;
use indexmap::IndexMap;
use itertools::{EitherOrBoth, Itertools};
use std::ops::Index;
use tracing::instrument;

/// A declared parameter of a sized function.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    name: String,
    default: Option<Value>,
}

impl Param {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// The declared parameters of a sized function, in declaration order.
///
/// Defaults belong on trailing parameters, as in any call signature. A
/// required parameter declared after a defaulted one is still accepted: it
/// has to be passed by keyword, or positionally after a value for every slot
/// before it.
///
/// ```rust
/// use sized_gen_impl::{call_args, Signature};
///
/// let signature = Signature::new("make")
///     .param("n")
///     .param_with_default("step", 1);
///
/// let args = signature.bind(&call_args![10]).unwrap();
/// assert_eq!(args["n"], args["0"]);
/// assert_eq!(args["step"].as_int(), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    name: String,
    params: Vec<Param>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Signature {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Declares a required parameter.
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: None,
        });
        self
    }

    /// Declares a parameter that falls back to `default` when the caller omits it.
    pub fn param_with_default(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: Some(default.into()),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Binds one call's arguments to the declared parameters.
    ///
    /// A slot takes its keyword argument first, then the positional argument at
    /// its index, then its default. Every parameter is recorded under its name
    /// and under its stringified index.
    #[instrument(level = "trace", skip(self, call), fields(function = %self.name))]
    pub fn bind(&self, call: &CallArgs) -> Result<Arguments> {
        if let Some(unknown) = call
            .keywords
            .keys()
            .find(|k| !self.params.iter().any(|p| &p.name == *k))
        {
            return Err(Error::UnexpectedArgument {
                function: self.name.clone(),
                argument: unknown.clone(),
            });
        }

        let mut values = IndexMap::with_capacity(2 * self.params.len());
        let mut by_index = Vec::with_capacity(self.params.len());

        for (index, slot) in self.params.iter().zip_longest(&call.positional).enumerate() {
            let (param, value) = match slot {
                EitherOrBoth::Both(param, positional) => {
                    if call.keywords.contains_key(&param.name) {
                        return Err(Error::DuplicateArgument {
                            function: self.name.clone(),
                            parameter: param.name.clone(),
                        });
                    }
                    (param, positional.clone())
                }
                EitherOrBoth::Left(param) => {
                    let value = call
                        .keywords
                        .get(&param.name)
                        .or(param.default.as_ref())
                        .cloned()
                        .ok_or_else(|| Error::MissingArgument {
                            function: self.name.clone(),
                            parameter: param.name.clone(),
                        })?;
                    (param, value)
                }
                EitherOrBoth::Right(_) => {
                    return Err(Error::UnexpectedArgument {
                        function: self.name.clone(),
                        argument: index.to_string(),
                    })
                }
            };
            by_index.push((index.to_string(), value.clone()));
            values.insert(param.name.clone(), value);
        }

        values.extend(by_index);
        Ok(Arguments { values })
    }
}

/// The arguments of one call, exactly as the caller supplied them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CallArgs {
    positional: Vec<Value>,
    keywords: IndexMap<String, Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Sets a keyword argument. Setting the same name twice keeps the last value.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.insert(name.into(), value.into());
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keywords(&self) -> &IndexMap<String, Value> {
        &self.keywords
    }
}

/// Builds [`CallArgs`] from positional values followed by `name = value` pairs.
///
/// ```rust
/// use sized_gen_impl::call_args;
///
/// let call = call_args![25, "label", step = 2];
/// assert_eq!(call.positional().len(), 2);
/// assert_eq!(call.keywords()["step"].as_int(), Some(2));
/// ```
#[macro_export]
macro_rules! call_args {
    (@push $call:ident;) => {};
    (@push $call:ident; $name:ident = $value:expr $(, $($rest:tt)*)?) => {
        $call = $call.kwarg(stringify!($name), $value);
        $crate::call_args!(@push $call; $($($rest)*)?);
    };
    (@push $call:ident; $value:expr $(, $($rest:tt)*)?) => {
        $call = $call.arg($value);
        $crate::call_args!(@push $call; $($($rest)*)?);
    };
    ($($tokens:tt)*) => {{
        #[allow(unused_mut)]
        let mut call = $crate::CallArgs::new();
        $crate::call_args!(@push call; $($tokens)*);
        call
    }};
}

/// The argument mapping handed to size functions and targets.
///
/// Every declared parameter is present under its name and under its
/// positional index, so `args["n"]` and `args["0"]` agree whichever way the
/// caller passed `n`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arguments {
    values: IndexMap<String, Value>,
}

impl Arguments {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn positional(&self, index: usize) -> Option<&Value> {
        self.values.get(index.to_string().as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Index<&str> for Arguments {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self.values.get(key) {
            Some(value) => value,
            None => panic!("no argument named '{key}'"),
        }
    }
}

impl Index<usize> for Arguments {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self[index.to_string().as_str()]
    }
}
