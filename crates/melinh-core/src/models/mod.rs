//! Domain models for the MeLinh mini-app.

mod booking;
mod collection;
mod notice;
mod record;

pub use booking::*;
pub use collection::*;
pub use notice::*;
pub use record::*;
