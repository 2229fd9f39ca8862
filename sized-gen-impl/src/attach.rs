use crate::arguments::{Arguments, CallArgs, Signature};
use crate::coroutine::Coroutine;
use crate::error::Result;
use crate::size::{resolve, SizeSpec};
use crate::sized_generator::SizedGenerator;
use std::fmt;
use tracing::instrument;

/// A size specification waiting to be attached to a generator function.
#[derive(Debug, Clone)]
pub struct Attachment {
    size: SizeSpec,
}

/// Starts attaching `size` to a generator function.
///
/// ```rust
/// use sized_gen_impl::{call_args, sized, Arguments, IterCoroutine, Signature, SizeSpec};
///
/// let make = sized(SizeSpec::derived(|args: &Arguments| args["n"].clone())).attach(
///     Signature::new("make").param("n"),
///     |args: &Arguments| {
///         let n = args["n"].as_int().unwrap_or(0);
///         IterCoroutine::<_, String>::new(0..n)
///     },
/// );
///
/// let gen = make.call(call_args![25]).unwrap();
/// assert_eq!(gen.remaining(), 25);
/// ```
pub fn sized(size: impl Into<SizeSpec>) -> Attachment {
    Attachment { size: size.into() }
}

impl Attachment {
    /// Attaches the size to `target`, a function producing a sequence from the
    /// bound arguments of a call declared by `signature`.
    pub fn attach<F, C>(self, signature: Signature, target: F) -> SizedFn<F>
    where
        F: Fn(&Arguments) -> C,
        C: Coroutine,
    {
        SizedFn {
            size: self.size,
            signature,
            target,
        }
    }
}

/// A generator function whose sequences know their size.
pub struct SizedFn<F> {
    size: SizeSpec,
    signature: Signature,
    target: F,
}

impl<F> SizedFn<F> {
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn name(&self) -> &str {
        self.signature.name()
    }

    pub fn size(&self) -> &SizeSpec {
        &self.size
    }

    /// Calls the target and wraps what it returns.
    ///
    /// The size is resolved and the arguments are bound before the target
    /// runs, so a call that fails here has no side effects from the target.
    #[instrument(skip(self, call), fields(function = %self.signature.name()))]
    pub fn call<C>(&self, call: CallArgs) -> Result<SizedGenerator<C>>
    where
        F: Fn(&Arguments) -> C,
        C: Coroutine,
    {
        let (arguments, total) = if self.size.is_derived() {
            let arguments = self.signature.bind(&call)?;
            let total = resolve(&self.size, &arguments)?;
            (arguments, total)
        } else {
            let total = resolve(&self.size, &Arguments::default())?;
            (self.signature.bind(&call)?, total)
        };
        tracing::debug!(total, "resolved size");

        SizedGenerator::new((self.target)(&arguments), total)
    }
}

impl<F> fmt::Debug for SizedFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizedFn")
            .field("size", &self.size)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}
