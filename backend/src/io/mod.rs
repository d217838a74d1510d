//! # IO Layer
//!
//! Interfaces that expose the club site to the outside world. Only the JSON
//! REST API lives here today.

pub mod rest;
