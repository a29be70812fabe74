//! Terminal output for the `safetybot-gate` binary

mod console;

pub use console::Console;
