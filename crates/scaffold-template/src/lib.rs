#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

mod directive;
mod error;
mod language;
mod processor;
mod substitute;

pub use directive::Directive;
pub use error::{ConfigError, DirectiveError, ProcessError, ProcessErrorKind};
pub use language::{Language, PlaceholderStyle, ProcessOptions, UnresolvedPolicy};
pub use processor::{process, process_str};
pub use substitute::substitute_placeholders;
