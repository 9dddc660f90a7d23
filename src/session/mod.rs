mod controller;
mod state;

pub use controller::SessionController;
pub use state::{ClearFailure, ClearReport, PendingTurn, TurnOutcome, TurnState};
