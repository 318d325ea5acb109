use crate::{
    cast::{
        CastResult, Change, Continuation, Environment, Escaped, FrameRef,
        Mishap, ResolutionType, SideEffect, Sound,
    },
    config::CastConfig,
    iota::{Iota, IotaType},
    timed, unwrap,
};
use anyhow::{ensure, Context};
use log::{debug, trace};
use std::rc::Rc;
use validator::Validate;

/// The virtual machine for a single cast. A VM owns a value stack, a stack
/// of continuation frames, and the quotation state; nothing in here is
/// shared between casts.
///
/// The VM is driven from outside by [Self::run], which alternates between
/// draining frame work ([Self::step]) and executing external iotas
/// ([Self::execute]). Execution itself never mutates the VM; it returns a
/// [CastResult] whose diff the driver applies with [Self::apply]. That
/// split is what makes frames re-entrant without host-visible recursion:
/// a frame evaluates against a snapshot and hands back changes.
#[derive(Clone, Debug)]
pub struct CastVm {
    stack: Vec<Iota>,
    frames: Vec<FrameRef>,
    paren_count: usize,
    parenthesized: Vec<Escaped>,
    escape_next: bool,
    config: CastConfig,
}

impl CastVm {
    /// Create an empty VM. Returns an error if the given config is
    /// invalid.
    pub fn new(config: CastConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid config")?;
        Ok(Self {
            stack: Vec::new(),
            frames: Vec::new(),
            paren_count: 0,
            parenthesized: Vec::new(),
            escape_next: false,
            config,
        })
    }

    /// The value stack. The top is the **last** element.
    pub fn stack(&self) -> &[Iota] {
        &self.stack
    }

    /// The continuation frames still to run. The top is the last element.
    pub fn frames(&self) -> &[FrameRef] {
        &self.frames
    }

    /// The current quotation depth.
    pub fn paren_count(&self) -> usize {
        self.paren_count
    }

    /// The iotas accumulated inside the currently open quotation.
    pub fn parenthesized(&self) -> &[Escaped] {
        &self.parenthesized
    }

    /// Whether the next incoming iota is quoted regardless of type.
    pub fn escape_next(&self) -> bool {
        self.escape_next
    }

    /// Borrow the top `tags.len()` stack slots as action arguments,
    /// checking each slot's type. The leftmost tag binds to the deepest
    /// requested slot; a `None` tag accepts anything. Mishaps if the stack
    /// is too short or a tagged slot holds the wrong variant.
    pub fn stack_args(
        &self,
        tags: &[Option<IotaType>],
    ) -> Result<&[Iota], Mishap> {
        let wanted = tags.len();
        if self.stack.len() < wanted {
            return Err(Mishap::TooFewArgs {
                expected: wanted,
                found: self.stack.len(),
            });
        }
        let args = &self.stack[self.stack.len() - wanted..];
        for (slot, (tag, iota)) in tags.iter().zip(args).enumerate() {
            if let Some(expected) = tag {
                if iota.type_tag() != *expected {
                    return Err(Mishap::WrongType {
                        expected: *expected,
                        found: iota.type_tag(),
                        slot,
                    });
                }
            }
        }
        Ok(args)
    }

    /// Apply one change record. See [Change] for the field ordering this
    /// follows. Panics on changes no well-formed action produces, e.g.
    /// popping more iotas than the stack holds.
    pub fn apply(&mut self, change: &Change) {
        // Quotation depth first, so a close-quote clears the buffer before
        // any push in the same change could repopulate it
        if change.escape_intro {
            self.paren_count += 1;
        }
        if change.escape_retro {
            self.paren_count = unwrap!(
                self.paren_count.checked_sub(1),
                "no open quotation to close; change = {:?}",
                change
            );
            if self.paren_count == 0 {
                self.parenthesized.clear();
            }
        }

        // A quoted iota records the *pre-change* escape flag
        let escape_push_fired = change.escape_push.is_some();
        if let Some(iota) = &change.escape_push {
            self.parenthesized.push(Escaped {
                iota: iota.clone(),
                escaped: self.escape_next,
            });
        }
        self.escape_next = match change.escape_consider {
            Some(consider) => consider,
            None if escape_push_fired => false,
            None => self.escape_next,
        };

        if let Some(stack) = &change.stack_set {
            self.stack = stack.clone();
        }
        if change.stack_pop > 0 {
            let len = self.stack.len();
            assert!(
                change.stack_pop <= len,
                "cannot pop {} iotas from a stack of {}",
                change.stack_pop,
                len
            );
            self.stack.truncate(len - change.stack_pop);
        }
        if let Some((from, to)) = change.stack_move {
            let iota = self.stack.remove(from);
            self.stack.insert(to, iota);
        }
        self.stack.extend(change.stack_push.iter().cloned());

        if let Some(frames) = &change.frame_set {
            self.frames = frames.clone();
        }
        if change.frame_pop > 0 {
            let len = self.frames.len();
            assert!(
                change.frame_pop <= len,
                "cannot pop {} frames from a stack of {}",
                change.frame_pop,
                len
            );
            self.frames.truncate(len - change.frame_pop);
        }
        self.frames.extend(change.frame_push.iter().cloned());
    }

    /// Resolve one iota into a result, without applying it. The dispatch:
    ///
    /// 1. An action-bearing iota executes, unless an escape is pending or
    ///    a quotation is open (the escape controls themselves stay active
    ///    inside quotations).
    /// 2. Otherwise, with an escape pending or a quotation open, the iota
    ///    is quoted: into the quotation buffer if one is open, else
    ///    straight onto the stack.
    /// 3. Otherwise the iota is a raw value at the top level, which is a
    ///    mishap.
    pub fn execute(
        &self,
        iota: &Iota,
        env: &dyn Environment,
    ) -> CastResult {
        match iota {
            Iota::Pattern(pattern)
                if !self.escape_next
                    && (self.paren_count == 0 || pattern.must_escape()) =>
            {
                trace!("executing {}", pattern.name());
                match pattern.run(self, env) {
                    Ok(outcome) => CastResult {
                        cast: Some(iota.clone()),
                        diff: outcome.diff,
                        side_effects: Vec::new(),
                        resolution: outcome.resolution,
                        sound: outcome.sound,
                    },
                    Err(mishap) => {
                        debug!(
                            "mishap while executing {}: {}",
                            pattern.name(),
                            mishap
                        );
                        CastResult {
                            cast: Some(iota.clone()),
                            diff: Vec::new(),
                            side_effects: vec![SideEffect::Mishap(mishap)],
                            resolution: ResolutionType::Errored,
                            sound: Sound::Mishap,
                        }
                    }
                }
            }
            Iota::Continuation(continuation)
                if !self.escape_next && self.paren_count == 0 =>
            {
                let mut result = self.execute_jump(continuation);
                result.cast = Some(iota.clone());
                result
            }
            _ if self.paren_count > 0 => CastResult {
                cast: Some(iota.clone()),
                diff: vec![Change {
                    escape_push: Some(iota.clone()),
                    ..Change::default()
                }],
                side_effects: Vec::new(),
                resolution: ResolutionType::Escaped,
                sound: Sound::NormalExecute,
            },
            _ if self.escape_next => CastResult {
                cast: Some(iota.clone()),
                diff: vec![Change {
                    stack_push: vec![iota.clone()],
                    escape_consider: Some(false),
                    ..Change::default()
                }],
                side_effects: Vec::new(),
                resolution: ResolutionType::Escaped,
                sound: Sound::NormalExecute,
            },
            _ => CastResult {
                cast: Some(iota.clone()),
                diff: Vec::new(),
                side_effects: vec![SideEffect::Mishap(
                    Mishap::UnescapedValue { iota: iota.clone() },
                )],
                resolution: ResolutionType::Invalid,
                sound: Sound::Mishap,
            },
        }
    }

    /// Replace the frame stack with a continuation's snapshot.
    pub fn execute_jump(&self, continuation: &Continuation) -> CastResult {
        CastResult {
            cast: None,
            diff: vec![Change {
                frame_set: Some(continuation.frames().to_vec()),
                ..Change::default()
            }],
            side_effects: Vec::new(),
            resolution: ResolutionType::Evaluated,
            sound: Sound::Hermes,
        }
    }

    /// Unwind frames from the top until one captures the break. Every
    /// popped frame gets to restore the stack as it goes; a Thoth fold,
    /// for example, publishes its partial accumulator. The capturing frame
    /// is popped too, and the unwind stops there.
    pub fn execute_break(&self) -> CastResult {
        let mut unwound = self.clone();
        let mut diff = Vec::new();
        while let Some(frame) = unwound.frames.last().map(Rc::clone) {
            let pop = Change {
                frame_pop: 1,
                ..Change::default()
            };
            unwound.apply(&pop);
            diff.push(pop);

            let restore = frame.restore_stack(unwound.stack());
            unwound.apply(&restore);
            diff.push(restore);

            if frame.captures_break() {
                break;
            }
        }
        CastResult {
            cast: None,
            diff,
            side_effects: Vec::new(),
            resolution: ResolutionType::Evaluated,
            sound: Sound::Hermes,
        }
    }

    /// Evaluate the topmost frame, if there is one. Like [Self::execute]
    /// this doesn't apply anything; the caller applies the returned diff.
    pub fn step(&self, env: &dyn Environment) -> Option<CastResult> {
        let frame = Rc::clone(self.frames.last()?);
        Some(frame.evaluate(self, env))
    }

    /// Run a program to completion: for each external iota, first drain
    /// all pending frame work, then execute and apply the iota; drain once
    /// more after the last one. Returns every result produced along the
    /// way, in order. Errors only on config-limit violations; mishaps are
    /// reported in the result log, not as errors.
    pub fn run(
        &mut self,
        env: &dyn Environment,
        iotas: impl IntoIterator<Item = Iota>,
    ) -> anyhow::Result<Vec<CastResult>> {
        timed!("Cast", log::Level::Debug, {
            let mut results = Vec::new();
            let mut steps = 0u64;
            for iota in iotas {
                self.drain(env, &mut results, &mut steps)?;
                let result = self.execute(&iota, env);
                self.apply_result(&result)?;
                results.push(result);
            }
            self.drain(env, &mut results, &mut steps)?;
            debug!(
                "cast finished: {} results, stack depth {}",
                results.len(),
                self.stack.len()
            );
            Ok(results)
        })
    }

    /// Step until the frame stack is quiescent.
    fn drain(
        &mut self,
        env: &dyn Environment,
        results: &mut Vec<CastResult>,
        steps: &mut u64,
    ) -> anyhow::Result<()> {
        while let Some(result) = self.step(env) {
            *steps += 1;
            ensure!(
                *steps <= self.config.max_steps,
                "step budget of {} exhausted; likely an infinite loop",
                self.config.max_steps
            );
            self.apply_result(&result)?;
            results.push(result);
        }
        Ok(())
    }

    /// Apply a result's diff and check the configured limits.
    fn apply_result(&mut self, result: &CastResult) -> anyhow::Result<()> {
        for change in &result.diff {
            self.apply(change);
        }
        ensure!(
            self.stack.len() <= self.config.max_stack_depth,
            "stack depth limit of {} exceeded",
            self.config.max_stack_depth
        );
        ensure!(
            self.frames.len() <= self.config.max_frame_depth,
            "frame depth limit of {} exceeded",
            self.config.max_frame_depth
        );
        Ok(())
    }
}
