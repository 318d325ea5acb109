use crate::{
    cast::{CastVm, Change, Environment, Mishap, ResolutionType, Sound},
    hex::HexPattern,
    iota::Iota,
};

/// The signature of a built-in behaviour. The pattern itself is passed in
/// so that behaviours which re-quote themselves (the escape controls) can
/// do so without a registry lookup.
pub type ActionFn =
    fn(&PatternIota, &CastVm, &dyn Environment) -> Result<Outcome, Mishap>;

/// What a pattern does when it executes.
#[derive(Clone, Debug)]
pub enum Action {
    /// Push a copy of a fixed value onto the stack. This covers all the
    /// constant reflections, including the numerical ones.
    Push(Box<Iota>),
    /// Run a behaviour against the current VM state.
    Invoke(ActionFn),
}

/// The successful result of running an action: a list of VM transitions
/// plus how the execution should be reported. The default is an empty diff
/// that resolved normally.
#[derive(Clone, Debug)]
pub struct Outcome {
    pub diff: Vec<Change>,
    pub resolution: ResolutionType,
    pub sound: Sound,
}

impl Default for Outcome {
    fn default() -> Self {
        Self {
            diff: Vec::new(),
            resolution: ResolutionType::Evaluated,
            sound: Sound::NormalExecute,
        }
    }
}

/// A value that binds a hex-grid walk to an action. This is the unit of
/// program text: executing a program means feeding a stream of these to
/// the VM.
///
/// Equality follows [HexPattern] equality, i.e. two pattern iotas are equal
/// iff they are the same shape, regardless of name, orientation or action.
#[derive(Clone, Debug)]
pub struct PatternIota {
    pattern: HexPattern,
    name: String,
    action: Action,
    must_escape: bool,
}

impl PatternIota {
    pub fn new(
        pattern: HexPattern,
        name: impl Into<String>,
        action: Action,
        must_escape: bool,
    ) -> Self {
        Self {
            pattern,
            name: name.into(),
            action,
            must_escape,
        }
    }

    pub fn pattern(&self) -> &HexPattern {
        &self.pattern
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this pattern stays active inside a quotation. Only the
    /// escape controls themselves set this; everything else gets quoted
    /// like a plain value when a quotation is open.
    pub fn must_escape(&self) -> bool {
        self.must_escape
    }

    /// Run this pattern's action against the given VM state.
    pub fn run(
        &self,
        vm: &CastVm,
        env: &dyn Environment,
    ) -> Result<Outcome, Mishap> {
        match &self.action {
            Action::Push(iota) => Ok(Outcome {
                diff: vec![Change {
                    stack_push: vec![(**iota).clone()],
                    ..Change::default()
                }],
                ..Outcome::default()
            }),
            Action::Invoke(action) => action(self, vm, env),
        }
    }
}

impl PartialEq for PatternIota {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for PatternIota {}
