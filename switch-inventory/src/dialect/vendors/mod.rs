//! Built-in dialect definitions.

pub mod arista_eos;
pub mod cisco_ios;
