//! The standard domain
//!
//! [`standard()`] installs every extension of this crate. Builder layers are
//! consulted in this order:
//!
//! 1. [`MakeStatus`]
//! 2. [`Logging`]
//! 3. [`Describe`]
//! 4. [`Tee`]
//! 5. [`Print`]
//! 6. [`Passthrough`]
//!
//! so a `Status` target is always built by the status layer, other targets
//! fall through to pass-through, and the logger sees an error before any tee
//! sink does. `bool`, `Option` and `Result` subjects are accepted through
//! their own `Verify`/`Attempt` impls.

use crate::description::{description, Describe};
use crate::forward::{forward, Forward};
use crate::logging::{logging, Logging};
use crate::passthrough::{passthrough, Passthrough};
use crate::print::{print, Print};
use crate::print_operands::{print_operands, PrintOperands};
use crate::status::{status, MakeStatus};
use crate::tee::{tee, Tee};
use faultline_core::{Domain, Stack};

/// Policy stack of [`Standard`]
pub type StandardPolicy = Stack<
    (),
    Stack<(), Stack<(), Stack<(), Stack<Forward, Stack<PrintOperands, Stack<(), Stack<(), ()>>>>>>>,
>;

/// Builder stack of [`Standard`]
pub type StandardBuilder = Stack<
    MakeStatus,
    Stack<
        Logging,
        Stack<Describe, Stack<Tee, Stack<(), Stack<(), Stack<Print, Stack<Passthrough, ()>>>>>>,
    >,
>;

/// Type of [`standard()`]
pub type Standard = Domain<StandardPolicy, StandardBuilder>;

/// Domain with every extension of this crate installed
pub fn standard() -> Standard {
    Domain::new().with((
        passthrough(),
        print(),
        print_operands(),
        forward(),
        tee(),
        description(),
        logging(),
        status(),
    ))
}
