//! The video operations behind the HTTP API, generic over the [`VideoStore`](crate::store::VideoStore) they run on.

mod catalog;
mod error;
mod search;

pub use catalog::*;
pub use error::*;
pub use search::*;
