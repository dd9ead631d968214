// Library crate: the headless editor core (scene graph, history, persistence)
// plus the command protocol and test helpers. The binary is a thin runner.

pub mod command;
pub mod events;
pub mod export;
pub mod fixtures;
pub mod harness;
pub mod object;
pub mod snapshot;
pub mod state;
pub mod store;
