//! Everything above the raw VM: the built-in action set, the registry
//! that resolves walks into actions, the Numerical Reflection table, and
//! the shorthand compiler that turns literal trees into pattern sequences.

pub mod builtins;
pub mod number;
pub mod shorthand;

pub use self::{
    builtins::PatternRegistry,
    number::numerical_reflection,
    shorthand::{compile, Literal},
};
