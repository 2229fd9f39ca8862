use crate::error::Result;
use crate::size::{resolve_fixed, SizeSpec};
use crate::sized_generator::State;
use core::pin::Pin;
use futures::stream::{FusedStream, Stream};
use futures::task::{Context, Poll};
use tracing::debug;

/// The asynchronous counterpart of [`SizedGenerator`](crate::SizedGenerator).
///
/// An item counts against the size when the inner stream produces it, and the
/// poll that observes the end of the inner stream counts as one more pull.
pub struct SizedStream<S> {
    stream: Option<S>,
    total: i64,
    consumed: i64,
    state: State,
}

impl<S: Stream + Unpin> SizedStream<S> {
    pub fn new(stream: S, size: impl Into<SizeSpec>) -> Result<Self> {
        let total = resolve_fixed(&size.into())?;
        Ok(SizedStream {
            stream: Some(stream),
            total,
            consumed: 0,
            state: if total <= 0 {
                State::Exhausted
            } else {
                State::Active
            },
        })
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

    /// Drops the inner stream. The sized stream ends immediately afterwards.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            debug!(consumed = self.consumed, total = self.total, "sized stream closed");
        }
        self.state = State::Closed;
    }

    fn exhaust(&mut self) {
        if self.state == State::Active {
            self.state = State::Exhausted;
            debug!(consumed = self.consumed, total = self.total, "sized stream exhausted");
        }
    }
}

impl<S: Stream + Unpin> Stream for SizedStream<S> {
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        if this.state != State::Active {
            return Poll::Ready(None);
        }
        let stream = match this.stream.as_mut() {
            Some(stream) => stream,
            None => return Poll::Ready(None),
        };

        match Pin::new(stream).poll_next(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(item)) => {
                this.consumed += 1;
                if this.consumed >= this.total {
                    this.exhaust();
                }
                Poll::Ready(Some(item))
            }
            Poll::Ready(None) => {
                this.consumed += 1;
                this.exhaust();
                Poll::Ready(None)
            }
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

impl<S: Stream + Unpin> FusedStream for SizedStream<S> {
    fn is_terminated(&self) -> bool {
        self.state != State::Active
    }
}

/// Glue trait giving any stream a declared size.
pub trait SizedStreamExt: Stream + Unpin + Sized {
    fn with_size(self, size: impl Into<SizeSpec>) -> Result<SizedStream<Self>> {
        SizedStream::new(self, size)
    }
}

impl<S: Stream + Unpin> SizedStreamExt for S {}
