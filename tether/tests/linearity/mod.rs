//! Ownership and linearity of move-only values.

use super::*;

mod accesses;
mod consumption;
mod deinit;
mod matching;
mod merges;
mod ownership;
