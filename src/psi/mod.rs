//! MPEG-2 Program-Specific Information parsing (C1).
//!
//! Pure, allocation-returning functions: no I/O, no global state. A malformed
//! section never panics or reads past the buffer it was given — see the
//! `quickcheck` properties in [`fuzz`] for the totality property this crate
//! relies on elsewhere (the catalog builder treats any [`ParseError`] as
//! recoverable per-program, never as a panic).

pub mod cursor;
pub mod pat;
pub mod pmt;

pub use pat::{PatEntry, PatRecord, parse_pat};
pub use pmt::{LangTag, PmtElementaryStream, PmtRecord, parse_pmt};

#[cfg(test)]
mod fuzz {
    use super::*;
    use quickcheck_macros::quickcheck;

    /// Parser totality (§8): for any byte slice, parsing returns either a
    /// valid record or a `ParseError`, never a panic or an out-of-bounds read.
    /// `quickcheck` drives this with thousands of random slices per run.
    #[quickcheck]
    fn parse_pat_never_panics(bytes: Vec<u8>) -> bool {
        let _ = parse_pat(&bytes);
        true
    }

    #[quickcheck]
    fn parse_pmt_never_panics(bytes: Vec<u8>) -> bool {
        let _ = parse_pmt(&bytes);
        true
    }
}
