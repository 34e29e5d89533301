//! Type attribution over the lossless tree

mod attributor;
pub(crate) mod type_names;

pub use attributor::attribute;
