pub mod command;
pub mod editing;
pub mod transform;

// Re-export key types for easier usage
pub use command::*;
pub use editing::*;
pub use transform::*;
