pub mod filesystem;
pub mod walk;
