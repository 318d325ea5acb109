use crate::{
    cast::Mishap,
    iota::{Entity, Iota},
};
use derive_more::Display;
use std::rc::Rc;

/// The host world, as seen from inside a cast. The runtime performs no I/O
/// of its own; everything it knows about the outside comes through this
/// trait, and everything it wants done to the outside leaves as a
/// [SideEffect].
pub trait Environment {
    /// The entity on whose behalf the current program runs.
    fn caster(&self) -> Iota;
}

/// The simplest possible environment: a fixed caster and nothing else.
/// Useful for tests and for hosts that don't model a world.
#[derive(Clone, Debug)]
pub struct StaticEnvironment {
    caster: Rc<Entity>,
}

impl StaticEnvironment {
    pub fn new(caster: Rc<Entity>) -> Self {
        Self { caster }
    }
}

impl Environment for StaticEnvironment {
    fn caster(&self) -> Iota {
        Iota::Entity(Rc::clone(&self.caster))
    }
}

/// A deferred effect attached to a [crate::cast::CastResult]. The VM never
/// interprets these; the host inspects them after the step that produced
/// them.
#[derive(Clone, Debug, Display)]
pub enum SideEffect {
    /// A runtime misuse to report.
    #[display(fmt = "mishap: {}", _0)]
    Mishap(Mishap),
}
