//! Builtin voting module adapters

pub mod cw20_staked_balance;
pub mod cw4;
pub mod native_staked_balance;
