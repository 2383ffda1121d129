//! Core types for the batch lifecycle
//!
//! Input records flow in, batch requests flow out to the API, batch handles
//! come back from submission and polling, and result records are the final
//! artifact of an ended batch.

pub use batch::*;
pub use cache::*;
pub use input::*;
pub use request::*;
pub use result::*;

pub mod batch;
pub mod cache;
pub mod input;
pub mod request;
pub mod result;
