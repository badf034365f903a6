//! Template stores: where the template comes from.

mod builtin;
mod directory;

pub use builtin::BuiltinStore;
pub use directory::DirectoryStore;
