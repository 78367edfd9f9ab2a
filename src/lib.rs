//! tix plugin contract - plugin-side types for the tix ticket CLI
//!
//! tix plugins are separate programs spawned by the `tix` host with a JSON
//! context file and a handful of environment variables. This crate provides
//! the typed invocation contract ([`PluginContext`]), the host environment
//! conventions ([`host`]), and the template entry point ([`template`]) that
//! the `tix-plugin-template` binary demonstrates.

pub mod context;
pub mod host;
pub mod template;

pub use context::{PluginContext, Ticket, TicketValue};
pub use host::HostError;
