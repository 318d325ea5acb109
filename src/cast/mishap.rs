use crate::iota::{Iota, IotaType};
use derive_more::Display;

/// A runtime misuse: wrong argument types, an empty stack, a stray
/// close-quote. Mishaps are values, not panics; an action that mishaps
/// produces a [crate::cast::CastResult] with an errored resolution and the
/// VM carries on. Panics are reserved for internal bugs.
#[derive(Clone, Debug, Display)]
pub enum Mishap {
    /// The stack held fewer iotas than the action needed.
    #[display(
        fmt = "expected at least {} iotas on the stack, found {}",
        expected,
        found
    )]
    TooFewArgs { expected: usize, found: usize },

    /// A stack slot held the wrong type of iota. The slot index counts
    /// from the deepest requested argument.
    #[display(
        fmt = "expected {} in argument slot {}, found {}",
        expected,
        slot,
        found
    )]
    WrongType {
        expected: IotaType,
        found: IotaType,
        slot: usize,
    },

    /// A plain value arrived at the top level with no quotation open and
    /// no escape pending.
    #[display(fmt = "cannot execute a raw {}", "iota.type_tag()")]
    UnescapedValue { iota: Iota },

    /// Retrospection with no quotation open.
    #[display(fmt = "there is no quotation to close")]
    TooManyCloseParens,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let mishap = Mishap::TooFewArgs {
            expected: 2,
            found: 0,
        };
        assert_eq!(
            mishap.to_string(),
            "expected at least 2 iotas on the stack, found 0"
        );

        let mishap = Mishap::WrongType {
            expected: IotaType::List,
            found: IotaType::Double,
            slot: 1,
        };
        assert_eq!(
            mishap.to_string(),
            "expected list in argument slot 1, found double"
        );

        let mishap = Mishap::UnescapedValue {
            iota: Iota::Double(3.0),
        };
        assert_eq!(mishap.to_string(), "cannot execute a raw double");
    }
}
