//! Classpath infrastructure: class file decoding, archives and the resolver

mod archive;
mod artifacts;
mod class_reader;
mod resolver;
mod signature;
mod symbol_index;

pub use archive::ArchiveHandle;
pub use artifacts::find_artifacts;
pub use class_reader::{parse_class, ClassParseError};
pub use resolver::ClasspathResolver;
pub use symbol_index::SymbolIndex;
