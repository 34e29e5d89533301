//! Tree-sitter backed construction of lossless trees

mod builder;
pub(crate) mod kind_map;

pub use builder::TreeBuilder;
