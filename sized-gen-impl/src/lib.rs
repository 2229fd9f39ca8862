pub use anyhow;
pub use futures;
pub mod arguments;
pub mod attach;
pub mod coroutine;
pub mod error;
pub mod size;
pub mod sized_generator;
pub mod sized_stream;
pub mod value;

pub use arguments::{Arguments, CallArgs, Param, Signature};
pub use attach::{sized, Attachment, SizedFn};
pub use coroutine::{generator, Coroutine, GenCoroutine, IterCoroutine, Resume, Yielder};
pub use error::{Error, Result, ResumeError};
pub use size::{resolve, resolve_fixed, Length, SizeSpec};
pub use sized_generator::{SizedGenerator, State, WithSize};
pub use sized_stream::{SizedStream, SizedStreamExt};
pub use value::Value;
