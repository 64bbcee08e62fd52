//! Security subsystem.
//!
//! Only header hygiene lives here: the gate itself is a header check in
//! `routing::matcher`, and there is no authentication layer.

pub mod headers;
