//! `@include` 展开

pub mod error;
pub mod resolver;

pub use error::{IncludeError, IncludeErrorKind};
pub use resolver::{IncludeResolver, TokenStream};
