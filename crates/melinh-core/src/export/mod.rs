//! Export and import of admin collections.

mod collection;

pub use collection::*;
