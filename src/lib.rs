//! Hexweave is a stack-based, pattern-driven casting runtime built on a
//! pointy-top hexagonal grid. A program is a stream of *patterns*, walks
//! on the grid serialized as a starting direction plus a string of turns;
//! each pattern denotes an action, and running a program means feeding the
//! stream to a virtual machine that maintains a value stack, a stack of
//! continuation frames, and a small quotation state.
//!
//! ```
//! use hexweave::{
//!     spell, CastConfig, CastVm, Entity, EntityType, Iota,
//!     StaticEnvironment,
//! };
//! use std::rc::Rc;
//!
//! let kind = Rc::new(EntityType::new("Player"));
//! let env = StaticEnvironment::new(Rc::new(Entity::new(kind, "Astavie")));
//!
//! // Build the program [3] (a quoted list holding the number three)
//! let program = spell::compile(&[spell::Literal::List(vec![
//!     spell::Literal::Num(3.0),
//! ])])
//! .unwrap();
//!
//! let mut vm = CastVm::new(CastConfig::default()).unwrap();
//! let results = vm
//!     .run(&env, program.into_iter().map(Iota::Pattern))
//!     .unwrap();
//! assert!(results.iter().all(|result| result.resolution.success()));
//! assert_eq!(vm.stack().len(), 1);
//! ```
//!
//! The host supplies an [Environment] and interprets the [SideEffect]s
//! attached to each [CastResult]; the runtime itself performs no I/O. See
//! [CastVm] for the execution model and [spell] for the built-in action
//! set and the shorthand compiler.

mod cast;
mod config;
mod hex;
mod iota;
pub mod spell;
mod util;

pub use crate::{
    cast::{
        CastResult, CastVm, Change, Continuation, ContinuationFrame,
        Environment, Escaped, FrameRef, HermesFrame, Mishap,
        ResolutionType, SideEffect, Sound, StaticEnvironment, ThothFrame,
    },
    config::CastConfig,
    hex::{HexAngle, HexCoord, HexDir, HexPattern, Point2},
    iota::{
        Action, ActionFn, Entity, EntityType, Fragment, Iota, IotaType,
        Outcome, PatternIota, Vec3, TOLERANCE,
    },
    spell::{Literal, PatternRegistry},
    util::color::Color3,
};
pub use anyhow;
pub use validator;
