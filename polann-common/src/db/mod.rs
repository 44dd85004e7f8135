//! SQLite-backed comment and annotation store

pub mod decisions;
pub mod init;
pub mod items;
pub mod judgments;

pub use decisions::*;
pub use init::*;
pub use items::*;
pub use judgments::*;
