// Clow Browser shared type definitions
// Each submodule defines types used across the application.

pub mod chrome;
pub mod errors;
pub mod ipc;
pub mod settings;
pub mod tab;
