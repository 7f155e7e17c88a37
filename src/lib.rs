pub mod api;
pub mod common;
pub mod controller;
pub mod entities;
pub mod models;
pub mod repositories;
pub mod settings;
pub mod usecases;
