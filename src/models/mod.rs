pub mod candidate;
pub mod filesystem;
