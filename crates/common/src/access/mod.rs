mod gate;

pub use gate::{AccessDecision, AccessGate, Grant};
