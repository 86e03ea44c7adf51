//! oneseat — one crew per vehicle, no uninvited passengers.
//!
//! A mount gate for multiplayer game hosts. The host calls
//! [`gate::MountGate::can_mount`] before an actor mounts a seat; the gate
//! refuses when the vehicle is already occupied by non-teammates and the
//! vehicle type's rule says so.
//!
//! See `DESIGN.md` for architecture notes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod logging;
pub mod types;

pub mod policy;
pub mod store;

pub mod messages;
pub mod permissions;
pub mod teams;
pub mod vehicles;

pub mod gate;
pub mod scenario;
