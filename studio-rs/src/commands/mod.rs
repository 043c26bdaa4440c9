//! Command implementations

pub mod mdl;
