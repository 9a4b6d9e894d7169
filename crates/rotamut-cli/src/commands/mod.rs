pub mod library;
pub mod mutate;
