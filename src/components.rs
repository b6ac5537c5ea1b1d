//! Reusable HTML components for page generation

pub mod layout;
