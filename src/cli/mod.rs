//! Interactive shell commands.

pub mod order;
pub mod output;

pub use order::OrderCommands;
pub use output::{BufferedOutput, ConsoleOutput, Level, OutputSink};
