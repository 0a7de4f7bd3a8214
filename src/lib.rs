//! hbs-i18n-language-server
//!
//! Language server for translation keys used in Handlebars templates and
//! defined in JSON catalogs.

pub mod config;
pub mod db;
pub mod ide;
pub mod indexer;
pub mod input;
pub mod syntax;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use ide::backend::Backend;
