use crate::coroutine::{Coroutine, IterCoroutine};
use crate::error::{Error, Result, ResumeError};
use crate::size::{resolve_fixed, SizeSpec};
use std::fmt;
use std::iter::FusedIterator;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Active,
    /// The declared size was reached or the underlying sequence ended,
    /// whichever came first.
    Exhausted,
    Closed,
}

/// A sequence that knows how many items it has left.
///
/// The size is fixed at construction. Every pull counts against it, including
/// a pull that fails, and no more than `total` pulls reach the underlying
/// sequence. [`remaining`](SizedGenerator::remaining) is never clamped, so a
/// negative size shows up as a negative count.
pub struct SizedGenerator<C> {
    coroutine: C,
    total: i64,
    consumed: i64,
    state: State,
}

impl<C: Coroutine> SizedGenerator<C> {
    /// Wraps `coroutine` with a declared size.
    ///
    /// The size must be a count or a length-queryable value; size functions
    /// are resolved by [`SizedFn`](crate::SizedFn) before a generator is built.
    pub fn new(coroutine: C, size: impl Into<SizeSpec>) -> Result<Self> {
        if coroutine.is_finished() {
            return Err(Error::NotASequence);
        }
        let total = resolve_fixed(&size.into())?;
        Ok(Self::with_total(coroutine, total))
    }

    pub(crate) fn with_total(coroutine: C, total: i64) -> Self {
        SizedGenerator {
            coroutine,
            total,
            consumed: 0,
            state: if total <= 0 {
                State::Exhausted
            } else {
                State::Active
            },
        }
    }

    /// Pulls the next item, resuming the sequence with `input`.
    ///
    /// Returns `Ok(None)` once the sequence is exhausted, without touching the
    /// underlying sequence again.
    pub fn advance(&mut self, input: C::Input) -> Result<Option<C::Yield>, ResumeError<C::Error>> {
        match self.state {
            State::Closed => return Err(ResumeError::Closed),
            State::Exhausted => return Ok(None),
            State::Active => {}
        }

        self.consumed += 1;
        trace!(consumed = self.consumed, total = self.total, "pulling");
        match self.coroutine.resume(input) {
            Ok(Some(item)) => {
                if self.consumed >= self.total {
                    self.exhaust();
                }
                Ok(Some(item))
            }
            Ok(None) => {
                self.exhaust();
                Ok(None)
            }
            Err(error) => {
                if self.coroutine.is_finished() {
                    self.exhaust();
                }
                Err(ResumeError::Raised(error))
            }
        }
    }

    /// Throws `error` into the underlying sequence and returns whatever it
    /// yields in response. This does not count as a pull.
    pub fn inject_failure(
        &mut self,
        error: C::Error,
    ) -> Result<Option<C::Yield>, ResumeError<C::Error>> {
        if self.state == State::Closed {
            return Err(ResumeError::Closed);
        }

        let outcome = self.coroutine.throw(error);
        if self.coroutine.is_finished() {
            self.exhaust();
        }
        outcome.map_err(ResumeError::Raised)
    }

    /// Closes the underlying sequence. Later pulls and injected failures fail
    /// with [`ResumeError::Closed`].
    pub fn close(&mut self) {
        if self.state != State::Closed {
            self.coroutine.close();
            self.state = State::Closed;
            debug!(consumed = self.consumed, total = self.total, "sized generator closed");
        }
    }

    fn exhaust(&mut self) {
        if self.state == State::Active {
            self.state = State::Exhausted;
            debug!(consumed = self.consumed, total = self.total, "sized generator exhausted");
        }
    }

    pub fn remaining(&self) -> i64 {
        self.total - self.consumed
    }

    pub fn consumed(&self) -> i64 {
        self.consumed
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn into_inner(self) -> C {
        self.coroutine
    }
}

impl<C> fmt::Debug for SizedGenerator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizedGenerator")
            .field("total", &self.total)
            .field("consumed", &self.consumed)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Iterates with default inputs. Failures raised by the sequence are
/// yielded as `Err`; iteration ends when the generator is exhausted or
/// closed.
impl<C> Iterator for SizedGenerator<C>
where
    C: Coroutine,
    C::Input: Default,
{
    type Item = Result<C::Yield, C::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance(Default::default()) {
            Ok(item) => item.map(Ok),
            Err(ResumeError::Closed) => None,
            Err(ResumeError::Raised(error)) => Some(Err(error)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.state {
            State::Active => usize::try_from(self.remaining().max(0)).unwrap_or(usize::MAX),
            State::Exhausted | State::Closed => 0,
        };
        (remaining, Some(remaining))
    }
}

impl<C> ExactSizeIterator for SizedGenerator<C>
where
    C: Coroutine,
    C::Input: Default,
{
}

impl<C> FusedIterator for SizedGenerator<C>
where
    C: Coroutine,
    C::Input: Default,
{
}

/// Glue trait giving any iterator a declared size.
pub trait WithSize: Iterator + Sized {
    fn with_size(self, size: impl Into<SizeSpec>) -> Result<SizedGenerator<IterCoroutine<Self>>> {
        SizedGenerator::new(IterCoroutine::new(self), size)
    }
}

impl<I: Iterator> WithSize for I {}
