//! Pluggable object transformation
//!
//! ## Key Components
//!
//! - [`Transformer`] - trait injected into the pipeline
//! - [`IdentityTransformer`], [`UppercaseTransformer`] - built-in strategies
//! - [`TransformerRegistry`] - name to instance lookup used by configuration
//! - [`range`] - range and part-number selection helpers

mod default;
pub mod range;
mod registry;
mod traits;

pub use default::{IdentityTransformer, UppercaseTransformer};
pub use registry::{RegistryError, TransformerRegistry};
pub use traits::{PostProcessError, TransformError, Transformer};
