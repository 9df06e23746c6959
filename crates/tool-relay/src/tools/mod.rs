//! A set of built-in tools that models can use.

mod echo;

pub use echo::EchoTool;
