#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

mod env;
pub mod eval;
mod scope;
mod value;

pub use env::Environment;
pub use eval::{evaluate, evaluate_str};
pub use scope::{Scope, ScopeLevel};
pub use value::Value;
