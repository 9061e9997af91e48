pub mod modal;
pub mod prefs;
pub mod store;

pub use modal::*;
pub use prefs::*;
pub use store::*;
