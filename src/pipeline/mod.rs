//! GetObject request pipeline
//!
//! validate → fetch → transform → range/part selection, ending in exactly one
//! [`Outcome`].

mod handler;
mod outcome;

pub use handler::GetObjectHandler;
pub use outcome::{OriginErrorResponse, OriginMetadata, Outcome};
