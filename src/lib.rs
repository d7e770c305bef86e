pub mod auth;
pub mod boletines;
pub mod catalogo;
pub mod error;
pub mod models;
pub mod usuarios;
