pub mod files;
pub mod settings;
