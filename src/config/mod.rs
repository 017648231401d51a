//! Configuration constants for the diagnostic core.
//!
//! Runtime configuration (listen addresses, credentials, model paths) belongs to
//! the transport layer that embeds this crate; the core only carries the fixed
//! domain constants grouped in [`defaults`].

pub mod defaults;
