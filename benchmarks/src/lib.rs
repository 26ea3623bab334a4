//! Call sites shared by the faultline benchmarks
//!
//! Each function is a typical use of the macros, kept out of line so the
//! benchmarks measure the expansion rather than constant folding.

use faultline_api::prelude::*;
use faultline_api::Standard;

/// Domain with logging and descriptions switched off
pub fn quiet() -> Standard {
    standard().no_log().default_error_code(Code::Internal)
}

/// `verify!` on a comparison
#[inline(never)]
pub fn bounded(domain: &Standard, len: usize, limit: usize) -> Result<usize, Status> {
    verify!(in domain; len < limit, |b| b.error_code(Code::OutOfRange));
    Ok(len)
}

/// `verify!` on a plain flag
#[inline(never)]
pub fn flagged(domain: &Standard, ready: bool) -> Result<(), Status> {
    verify!(in domain; ready);
    Ok(())
}

/// `attempt!` on an option
#[inline(never)]
pub fn lookup(domain: &Standard, table: &[u32], index: usize) -> Result<u32, Status> {
    let value = attempt!(in domain; table.get(index).copied(), |b| b.describe("index out of range"));
    Ok(value)
}

/// `attempt!` on a result carrying a status
#[inline(never)]
pub fn relay(domain: &Standard, input: Result<u32, Status>) -> Result<u32, Status> {
    let value = attempt!(in domain; input);
    Ok(value + 1)
}

/// A `bool` return with no message formatting
#[inline(never)]
pub fn gauge(ready: bool) -> bool {
    verify!(in Domain::new(); ready);
    true
}
