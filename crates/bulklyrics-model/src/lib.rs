pub mod song;
pub mod songlist;
pub mod state;

pub use song::*;
pub use songlist::*;
pub use state::*;
