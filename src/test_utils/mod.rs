//! Helpers shared by the unit tests of every module.
mod common;

pub(crate) use common::*;
