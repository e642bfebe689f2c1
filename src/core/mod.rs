// src/core/mod.rs

pub mod html;
pub mod ident;
pub mod sanitize;

pub use ident::Identity;
