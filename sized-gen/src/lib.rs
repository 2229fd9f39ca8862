//! sized-gen attaches a declared size to generators, so code driving them can
//! ask how many items remain without consuming any. Progress reporting and
//! buffer pre-allocation both rely on that count.
//!
//! The size comes from a constant, from something that already knows its
//! length, or from the arguments of the call that produced the generator.
//!
//! ## Example Usage
//!
//! ```rust
//! use sized_gen::{call_args, generator, sized, Arguments, Signature, SizeSpec};
//!
//! let make = sized(SizeSpec::derived(|args: &Arguments| args["n"].clone())).attach(
//!     Signature::new("make").param("n"),
//!     |args: &Arguments| {
//!         let n = args["n"].as_int().unwrap_or(0);
//!         generator(move |co| async move {
//!             for i in 0..n {
//!                 co.yield_(i).await?;
//!             }
//!             Ok::<(), String>(())
//!         })
//!     },
//! );
//!
//! let mut numbers = make.call(call_args![25]).unwrap();
//! assert_eq!(numbers.remaining(), 25);
//! assert_eq!(numbers.advance(()), Ok(Some(0)));
//! assert_eq!(numbers.remaining(), 24);
//! ```
//!
//! Iterators and streams can be sized directly:
//!
//! ```rust
//! use sized_gen::WithSize;
//!
//! let letters = "abc".chars().with_size(3).unwrap();
//! assert_eq!(letters.len(), 3);
//! ```

#[doc(no_inline)]
pub use crate as sized_gen; // used so that the tests can reference re-exported values
pub use sized_gen_impl;

pub use sized_gen_impl::{
    call_args, generator, resolve, sized, Arguments, Attachment, CallArgs, Coroutine, Error,
    GenCoroutine, IterCoroutine, Length, Param, Resume, ResumeError, Result, Signature,
    SizeSpec, SizedFn, SizedGenerator, SizedStream, SizedStreamExt, State, Value, WithSize,
    Yielder,
};

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream::{Stream, StreamExt};

    #[test]
    fn sized_function_round_trip() {
        let make = sized(SizeSpec::derived(|args: &Arguments| args["0"].clone())).attach(
            Signature::new("make").param("size_in"),
            |args: &Arguments| {
                let n = args["size_in"].as_int().unwrap_or(0);
                IterCoroutine::<_, String>::new(0..n)
            },
        );

        let gen = make.call(call_args![size_in = 4]).unwrap();
        assert_eq!(gen.len(), 4);
        assert_eq!(
            gen.collect::<std::result::Result<Vec<_>, _>>(),
            Ok(vec![0, 1, 2, 3])
        );
    }

    #[tokio::test]
    async fn sized_stream_reexport() {
        let stream = futures::stream::iter(vec![1, 2, 3]).with_size(vec![(); 3]).unwrap();
        assert_eq!(stream.size_hint(), (3, Some(3)));
        assert_eq!(stream.collect::<Vec<_>>().await, vec![1, 2, 3]);
    }
}
