pub mod axis;
pub mod clock;
pub mod progress;
pub mod runner;
pub mod scenario;
pub mod terminal;
