//! Builtin proposal module adapters

pub mod cw_proposal_single;
