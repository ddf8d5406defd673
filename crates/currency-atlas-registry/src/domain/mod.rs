//! Registry domain: commands, validation, admin policy, palette and projection.

pub mod admin;
pub mod commands;
pub mod palette;
pub mod projection;
pub mod validation;
