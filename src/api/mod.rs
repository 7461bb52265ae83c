/*
 * Responsibility
 * - console の URL 構造 (routes)
 * - guard rule / menu / extractor / view (askama) / form DTO / handler
 */
pub mod dto;
pub mod extractors;
pub mod guards;
pub mod handlers;
pub mod nav;
pub mod views;
mod routes;

pub use routes::routes;
