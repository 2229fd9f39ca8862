use genawaiter::sync::{Co, Gen};
use genawaiter::GeneratorState;
use std::future::Future;
use std::marker::PhantomData;

/// A suspended sequence that can be resumed, have a failure thrown into it,
/// or be closed.
///
/// `Ok(None)` from [`resume`](Coroutine::resume) or [`throw`](Coroutine::throw)
/// means the sequence has finished; it is an end signal, not a failure.
pub trait Coroutine {
    type Yield;
    type Input;
    type Error;

    /// Resumes the sequence with `input` and returns its next item.
    fn resume(&mut self, input: Self::Input) -> Result<Option<Self::Yield>, Self::Error>;

    /// Raises `error` at the point where the sequence is suspended. The sequence
    /// either recovers and yields, finishes, or hands the failure back.
    fn throw(&mut self, error: Self::Error) -> Result<Option<Self::Yield>, Self::Error>;

    /// Tears the sequence down. Later resumes report the end of the sequence.
    fn close(&mut self);

    fn is_finished(&self) -> bool;
}

impl<C: Coroutine + ?Sized> Coroutine for Box<C> {
    type Yield = C::Yield;
    type Input = C::Input;
    type Error = C::Error;

    fn resume(&mut self, input: Self::Input) -> Result<Option<Self::Yield>, Self::Error> {
        (**self).resume(input)
    }

    fn throw(&mut self, error: Self::Error) -> Result<Option<Self::Yield>, Self::Error> {
        (**self).throw(error)
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }
}

/// What a suspended generator body receives when it is resumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resume<S, E> {
    Next(S),
    Throw(E),
}

/// The handle a generator body yields through.
pub struct Yielder<Y, S, E> {
    co: Co<Y, Resume<S, E>>,
}

impl<Y, S, E> Yielder<Y, S, E> {
    /// Yields `value` and waits to be resumed. A failure thrown into the
    /// generator while it waits comes back as `Err`, so bodies can pass it on
    /// with `?` or recover from it.
    pub async fn yield_(&self, value: Y) -> Result<S, E> {
        match self.co.yield_(value).await {
            Resume::Next(input) => Ok(input),
            Resume::Throw(error) => Err(error),
        }
    }
}

/// A [`Coroutine`] backed by a genawaiter generator.
pub struct GenCoroutine<Y, S, E, F: Future<Output = Result<(), E>>> {
    gen: Option<Gen<Y, Resume<S, E>, F>>,
    started: bool,
}

/// Creates a generator from an async body.
///
/// ```rust
/// use sized_gen_impl::{generator, Coroutine};
///
/// let mut counter = generator(|co| async move {
///     for i in 0..2 {
///         co.yield_(i).await?;
///     }
///     Ok::<(), String>(())
/// });
///
/// assert_eq!(counter.resume(()), Ok(Some(0)));
/// assert_eq!(counter.resume(()), Ok(Some(1)));
/// assert_eq!(counter.resume(()), Ok(None));
/// ```
pub fn generator<Y, S, E, P, F>(producer: P) -> GenCoroutine<Y, S, E, F>
where
    P: FnOnce(Yielder<Y, S, E>) -> F,
    F: Future<Output = Result<(), E>>,
{
    GenCoroutine {
        gen: Some(Gen::new(|co| producer(Yielder { co }))),
        started: false,
    }
}

impl<Y, S, E, F> GenCoroutine<Y, S, E, F>
where
    F: Future<Output = Result<(), E>>,
{
    fn drive(&mut self, resume: Resume<S, E>) -> Result<Option<Y>, E> {
        let gen = match self.gen.as_mut() {
            Some(gen) => gen,
            None => {
                return match resume {
                    Resume::Next(_) => Ok(None),
                    Resume::Throw(error) => Err(error),
                }
            }
        };
        self.started = true;
        match gen.resume_with(resume) {
            GeneratorState::Yielded(item) => Ok(Some(item)),
            GeneratorState::Complete(result) => {
                self.gen = None;
                result.map(|()| None)
            }
        }
    }
}

impl<Y, S, E, F> Coroutine for GenCoroutine<Y, S, E, F>
where
    F: Future<Output = Result<(), E>>,
{
    type Yield = Y;
    type Input = S;
    type Error = E;

    fn resume(&mut self, input: S) -> Result<Option<Y>, E> {
        self.drive(Resume::Next(input))
    }

    fn throw(&mut self, error: E) -> Result<Option<Y>, E> {
        if !self.started {
            // the body never ran, so nothing can catch the failure
            self.gen = None;
            return Err(error);
        }
        self.drive(Resume::Throw(error))
    }

    fn close(&mut self) {
        self.gen = None;
    }

    fn is_finished(&self) -> bool {
        self.gen.is_none()
    }
}

/// A [`Coroutine`] over a plain iterator. It takes no input and cannot
/// recover from a thrown failure, so throwing finishes it.
pub struct IterCoroutine<I, E = anyhow::Error> {
    iter: Option<I>,
    error: PhantomData<fn() -> E>,
}

impl<I: Iterator, E> IterCoroutine<I, E> {
    pub fn new(iter: I) -> Self {
        IterCoroutine {
            iter: Some(iter),
            error: PhantomData,
        }
    }
}

impl<I: Iterator, E> Coroutine for IterCoroutine<I, E> {
    type Yield = I::Item;
    type Input = ();
    type Error = E;

    fn resume(&mut self, _input: ()) -> Result<Option<I::Item>, E> {
        let next = self.iter.as_mut().and_then(Iterator::next);
        if next.is_none() {
            self.iter = None;
        }
        Ok(next)
    }

    fn throw(&mut self, error: E) -> Result<Option<I::Item>, E> {
        self.iter = None;
        Err(error)
    }

    fn close(&mut self) {
        self.iter = None;
    }

    fn is_finished(&self) -> bool {
        self.iter.is_none()
    }
}
