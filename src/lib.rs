//! Heritage guide core library.
//!
//! Language selection and persistence, translation with local fallbacks,
//! and a data gateway that always answers from local data when the remote
//! backend is unavailable.

pub mod chat;
pub mod config;
pub mod context;
pub mod error;
pub mod fallback;
pub mod gateway;
pub mod i18n;
pub mod language_store;
pub mod models;
pub mod sequence;
pub mod speech;
pub mod translation;
pub mod view;
