pub mod bootstrap;
pub mod command;
pub mod controller;
pub mod refresh;
pub mod state;

pub use controller::AppController;
pub use refresh::CycleGate;
pub use state::{Applied, TrackerState};
