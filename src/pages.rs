//! Page generation modules for each view state
//!
//! This module organizes HTML page generators by outcome: the rendered
//! post (plus its loading placeholder) and the not-found redirect. Each
//! page module utilizes the shared layout from the components module.

pub mod post;
pub mod redirect;
