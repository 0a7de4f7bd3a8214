//! Salsa database holding catalog and template inputs.

/// Database trait shared by every query.
#[salsa::db]
pub trait I18nDatabase: salsa::Database {}

#[salsa::db]
#[derive(Clone, Default)]
pub struct I18nDatabaseImpl {
    /// Salsa storage
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl salsa::Database for I18nDatabaseImpl {}

#[salsa::db]
impl I18nDatabase for I18nDatabaseImpl {}
