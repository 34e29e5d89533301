mod type_ref;

pub use type_ref::TypeRef;
