pub mod manager;
pub mod reporter;
