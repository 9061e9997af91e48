pub mod actions;
pub mod palette;
pub mod reducer;
pub mod selectors;
pub mod snapshot;
pub mod state;

pub use actions::*;
pub use reducer::*;
pub use state::*;
