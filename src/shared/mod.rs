//! View state and messages shared by every front end
//!
//! Derived, presentation-ready data: which actions a detected plate allows
//! and what to tell the user after each one.

pub mod messages;
pub mod state;

pub use messages::ActionOutcome;
pub use state::PlateView;
