//! The virtual machine. A cast runs by feeding a stream of iotas to a
//! [CastVm], which maintains a value stack, a stack of continuation frames
//! and a small quotation state. Executing an iota resolves it into an
//! action, the action returns a list of declarative [Change] records, and
//! the VM applies them; control-flow actions push [ContinuationFrame]s that
//! the step loop evaluates back through the same machinery.

mod change;
mod env;
mod frame;
mod mishap;
mod result;
mod vm;

pub use self::{change::*, env::*, frame::*, mishap::*, result::*, vm::*};
