//! Helpers shared by several format renderers.

pub mod links;
