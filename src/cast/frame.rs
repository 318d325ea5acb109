use crate::{
    cast::{CastResult, CastVm, Change, Environment, ResolutionType, Sound},
    iota::Iota,
};
use std::{fmt::Debug, rc::Rc};

/// A shared handle to a frame on the VM's frame stack. Frames are immutable
/// once pushed; every step pops its frame and pushes replacements, so
/// sharing the records is safe and makes continuation snapshots cheap.
pub type FrameRef = Rc<dyn ContinuationFrame>;

/// A record of work the VM still has to do. The step loop evaluates the
/// topmost frame, applies whatever changes it returns, and repeats until
/// the frame stack is empty.
pub trait ContinuationFrame: Debug {
    /// Perform one step of this frame's work. The returned diff must
    /// include this frame's own bookkeeping (popping itself, pushing its
    /// successor) so that applying the result fully accounts for the step.
    fn evaluate(&self, vm: &CastVm, env: &dyn Environment) -> CastResult;

    /// Whether a break unwinding through the frame stack stops at this
    /// frame.
    fn captures_break(&self) -> bool;

    /// The change to apply when a break pops this frame mid-flight, given
    /// the stack as it stands at that point in the unwind.
    fn restore_stack(&self, stack: &[Iota]) -> Change;
}

/// A snapshot of the frame stack, as a first-class value. Executing a
/// continuation replaces the VM's frames with the snapshot, jumping the
/// cast back to the captured point.
#[derive(Clone, Debug)]
pub struct Continuation {
    frames: Vec<FrameRef>,
}

impl Continuation {
    pub fn new(frames: Vec<FrameRef>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[FrameRef] {
        &self.frames
    }
}

/// The linear sequencer: executes a list of iotas one per step, in order.
/// Pattern iotas run their actions; plain values evaluate to themselves
/// and land on the stack.
#[derive(Clone, Debug)]
pub struct HermesFrame {
    patterns: Vec<Iota>,
    captures_break: bool,
}

impl HermesFrame {
    pub fn new(patterns: Vec<Iota>, captures_break: bool) -> Self {
        Self {
            patterns,
            captures_break,
        }
    }
}

impl ContinuationFrame for HermesFrame {
    fn evaluate(&self, vm: &CastVm, env: &dyn Environment) -> CastResult {
        let (head, rest) = match self.patterns.split_first() {
            Some(parts) => parts,
            None => {
                // Nothing left to run; just retire this frame
                return CastResult {
                    cast: None,
                    diff: vec![Change {
                        frame_pop: 1,
                        ..Change::default()
                    }],
                    side_effects: Vec::new(),
                    resolution: ResolutionType::Evaluated,
                    sound: Sound::Nothing,
                };
            }
        };

        // Retire this frame and queue the remainder before executing the
        // head, so the head sees the frame stack it would continue onto
        let mut transition = Change {
            frame_pop: 1,
            ..Change::default()
        };
        if !rest.is_empty() {
            transition.frame_push = vec![Rc::new(HermesFrame::new(
                rest.to_vec(),
                self.captures_break,
            ))];
        }
        let mut stepped = vm.clone();
        stepped.apply(&transition);

        let inner = if head.has_action()
            || stepped.escape_next()
            || stepped.paren_count() > 0
        {
            stepped.execute(head, env)
        } else {
            // Plain data evaluates to itself
            CastResult {
                cast: Some(head.clone()),
                diff: vec![Change {
                    stack_push: vec![head.clone()],
                    ..Change::default()
                }],
                side_effects: Vec::new(),
                resolution: ResolutionType::Escaped,
                sound: Sound::Nothing,
            }
        };

        let CastResult {
            cast,
            diff: inner_diff,
            side_effects,
            resolution,
            sound,
        } = inner;
        let mut diff = vec![transition];
        diff.extend(inner_diff);
        CastResult {
            cast,
            diff,
            side_effects,
            resolution,
            sound,
        }
    }

    fn captures_break(&self) -> bool {
        self.captures_break
    }

    fn restore_stack(&self, _stack: &[Iota]) -> Change {
        Change::default()
    }
}

/// The map/accumulator: folds a body of instructions over a list of data.
/// Each iteration restores the stack to a base snapshot, pushes the next
/// datum, and runs the body via a [HermesFrame]; whatever the body leaves
/// on the stack is appended to an accumulator, which lands on the restored
/// stack as a list once the data runs out.
#[derive(Clone, Debug)]
pub struct ThothFrame {
    data: Vec<Iota>,
    code: Vec<Iota>,
    base_stack: Option<Vec<Iota>>,
    acc: Vec<Iota>,
}

impl ThothFrame {
    pub fn new(data: Vec<Iota>, code: Vec<Iota>) -> Self {
        Self {
            data,
            code,
            base_stack: None,
            acc: Vec::new(),
        }
    }
}

impl ContinuationFrame for ThothFrame {
    fn evaluate(&self, vm: &CastVm, _env: &dyn Environment) -> CastResult {
        // On first entry the current stack *is* the base; afterwards the
        // current stack is the previous iteration's output, which gets
        // harvested into the accumulator
        let (base, acc) = match &self.base_stack {
            None => (vm.stack().to_vec(), self.acc.clone()),
            Some(base) => {
                let mut acc = self.acc.clone();
                acc.extend(vm.stack().iter().cloned());
                (base.clone(), acc)
            }
        };

        let mut change = Change {
            frame_pop: 1,
            stack_set: Some(base.clone()),
            ..Change::default()
        };
        match self.data.split_first() {
            Some((head, rest)) => {
                change.stack_push = vec![head.clone()];
                change.frame_push = vec![
                    Rc::new(ThothFrame {
                        data: rest.to_vec(),
                        code: self.code.clone(),
                        base_stack: Some(base),
                        acc,
                    }),
                    Rc::new(HermesFrame::new(self.code.clone(), false)),
                ];
            }
            None => {
                change.stack_push = vec![Iota::List(acc)];
            }
        }

        CastResult {
            cast: None,
            diff: vec![change],
            side_effects: Vec::new(),
            resolution: ResolutionType::Evaluated,
            sound: Sound::Thoth,
        }
    }

    fn captures_break(&self) -> bool {
        true
    }

    fn restore_stack(&self, stack: &[Iota]) -> Change {
        // A break mid-fold publishes the partial accumulator, including
        // whatever the interrupted iteration had produced so far
        let mut acc = self.acc.clone();
        acc.extend(stack.iter().cloned());
        Change {
            stack_set: Some(self.base_stack.clone().unwrap_or_default()),
            stack_push: vec![Iota::List(acc)],
            ..Change::default()
        }
    }
}
