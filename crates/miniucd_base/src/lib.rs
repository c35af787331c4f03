//! Traits shared between the miniucd crates and implemented by `miniucd_macros`
#![no_std]

mod macro_traits;
pub use macro_traits::*;
