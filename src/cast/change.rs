use crate::{cast::FrameRef, iota::Iota};

/// An iota captured inside an open quotation, along with whether it got
/// there by being force-quoted (Consideration) rather than by arriving
/// while the quotation was open.
#[derive(Clone, Debug)]
pub struct Escaped {
    pub iota: Iota,
    pub escaped: bool,
}

/// A declarative record of a single VM transition. Actions never mutate the
/// VM; they return one or more of these, and [crate::cast::CastVm::apply]
/// performs them. All fields are optional in the sense that their defaults
/// are no-ops, so actions build changes with struct-update syntax off
/// [Change::default].
///
/// Within one change the fields apply in a fixed order:
///
/// 1. Quotation depth (`escape_intro` / `escape_retro`); if the depth falls
///    to zero the quotation buffer is cleared.
/// 2. `escape_push` appends to the quotation buffer, capturing the
///    *pre-change* escape-next flag.
/// 3. The escape-next flag becomes `escape_consider` if set; otherwise it
///    is cleared iff `escape_push` fired, and preserved if not.
/// 4. Stack: `stack_set`, then `stack_pop`, `stack_move`, `stack_push`.
/// 5. Frames: `frame_set`, then `frame_pop`, `frame_push`.
///
/// A list of changes applies left to right.
#[derive(Clone, Debug, Default)]
pub struct Change {
    /// Open one quotation level.
    pub escape_intro: bool,
    /// Close one quotation level. Closing at depth zero is an internal bug
    /// and panics.
    pub escape_retro: bool,
    /// Append an iota to the quotation buffer.
    pub escape_push: Option<Iota>,
    /// Force the escape-next flag to the given value.
    pub escape_consider: Option<bool>,
    /// Replace the whole stack.
    pub stack_set: Option<Vec<Iota>>,
    /// Remove this many iotas from the top of the stack.
    pub stack_pop: usize,
    /// Relocate the iota at the first index to the second.
    pub stack_move: Option<(usize, usize)>,
    /// Append iotas on top of the stack.
    pub stack_push: Vec<Iota>,
    /// Replace the whole frame stack.
    pub frame_set: Option<Vec<FrameRef>>,
    /// Remove this many frames from the top.
    pub frame_pop: usize,
    /// Append frames on top; the last entry ends up topmost.
    pub frame_push: Vec<FrameRef>,
}
