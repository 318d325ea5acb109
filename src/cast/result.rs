use crate::{
    cast::{Change, SideEffect},
    iota::Iota,
    util::color::Color3,
};
use derive_more::Display;

/// How the execution of a single iota resolved. Each resolution carries a
/// color pair for hosts that render cast feedback, and a success flag.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum ResolutionType {
    #[display(fmt = "unresolved")]
    Unresolved,
    #[display(fmt = "evaluated")]
    Evaluated,
    #[display(fmt = "escaped")]
    Escaped,
    #[display(fmt = "undone")]
    Undone,
    #[display(fmt = "errored")]
    Errored,
    #[display(fmt = "invalid")]
    Invalid,
}

impl ResolutionType {
    /// The (main, accent) color pair for rendering this resolution.
    pub fn colors(self) -> (Color3, Color3) {
        match self {
            Self::Unresolved => (
                Color3::new_int(0x7f, 0x7f, 0x7f),
                Color3::new_int(0xcc, 0xcc, 0xcc),
            ),
            Self::Evaluated => (
                Color3::new_int(0x73, 0x85, 0xde),
                Color3::new_int(0xfe, 0xcb, 0xe6),
            ),
            Self::Escaped => (
                Color3::new_int(0xdd, 0xcc, 0x73),
                Color3::new_int(0xff, 0xfa, 0xe5),
            ),
            Self::Undone | Self::Invalid => (
                Color3::new_int(0xb2, 0x6b, 0x6b),
                Color3::new_int(0xcc, 0xa8, 0x8e),
            ),
            Self::Errored => (
                Color3::new_int(0xde, 0x62, 0x62),
                Color3::new_int(0xff, 0xc7, 0xa0),
            ),
        }
    }

    /// Whether this resolution counts as the iota having done its job.
    pub fn success(self) -> bool {
        matches!(self, Self::Evaluated | Self::Escaped | Self::Undone)
    }
}

/// The sound a resolution makes, as an opaque priority-tagged label. When a
/// host plays at most one sound per batch of results, [Self::greater_of]
/// folds a batch down to the one that wins.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Sound {
    #[display(fmt = "nothing")]
    Nothing,
    #[display(fmt = "normal")]
    NormalExecute,
    #[display(fmt = "spell")]
    Spell,
    #[display(fmt = "hermes")]
    Hermes,
    #[display(fmt = "thoth")]
    Thoth,
    #[display(fmt = "mute")]
    Mute,
    #[display(fmt = "mishap")]
    Mishap,
}

impl Sound {
    /// The priority of this sound. Higher priorities win.
    pub fn priority(self) -> i64 {
        match self {
            Self::Nothing => i64::MIN,
            Self::NormalExecute => 0,
            Self::Spell => 1000,
            Self::Hermes => 2000,
            Self::Thoth => 2500,
            Self::Mute => 3000,
            Self::Mishap => 4000,
        }
    }

    /// Pick the higher-priority of two sounds.
    pub fn greater_of(self, other: Self) -> Self {
        if other.priority() > self.priority() {
            other
        } else {
            self
        }
    }
}

/// The full report of executing one iota: the iota itself, the VM
/// transitions it produced, any deferred side effects for the host, and
/// how it resolved.
#[derive(Clone, Debug)]
pub struct CastResult {
    /// The iota that was executed, when there was one. Frame-internal
    /// bookkeeping steps leave this empty.
    pub cast: Option<Iota>,
    /// The transitions to apply, in order.
    pub diff: Vec<Change>,
    /// Deferred effects for the host to interpret after the step.
    pub side_effects: Vec<SideEffect>,
    pub resolution: ResolutionType,
    pub sound: Sound,
}
