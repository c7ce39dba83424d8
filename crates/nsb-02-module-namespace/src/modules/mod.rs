//! Modules shipped with the service.

pub mod echo;
