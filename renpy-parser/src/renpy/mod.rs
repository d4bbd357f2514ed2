//! Main module for the Ren'Py front end

pub mod analysis;
pub mod ast;
pub mod diagnostics;
pub mod formats;
pub mod lexing;
pub mod parsing;
pub mod scoping;
pub mod testing;
pub mod token;
