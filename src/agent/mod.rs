pub mod bridge;
pub mod image;
pub mod prompt;
