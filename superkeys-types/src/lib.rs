//! # Super key types
//!
//! This crate provides the plain data types shared by the super key engine and
//! the configurator tooling talking to it.
//!
//! ## Modules
//!
//! - [`key`] - Raw 16-bit key codes and the reserved code ranges
//! - [`action`] - Decoded actions a stored key code can bind to a super key slot
//! - [`rank`] - Tap/hold ranks and the phases an action is resolved in
//! - [`keyswitch`] - Keyswitch state flags and physical key addresses

#![no_std]

pub mod action;
pub mod key;
pub mod keyswitch;
pub mod rank;
