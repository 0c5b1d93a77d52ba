//! Middleware for the gateway's HTTP surface.

pub mod cors;
