#![forbid(unsafe_code)]
#![deny(unused_must_use)]

pub mod model;
pub mod vars;
