mod cursor_condition;
mod error;
mod interpreter_impl;
mod merge;
mod nested_read;
mod plan;
mod read;

pub use error::*;
pub use interpreter_impl::ReadInterpreter;

pub type InterpretationResult<T> = std::result::Result<T, InterpreterError>;
