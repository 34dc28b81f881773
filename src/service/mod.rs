//! CatalogService: gated, validated catalog operations over a `CatalogStore`.

mod crud;
mod validation;
pub use crud::{book_initial, BookChoices, CatalogService, DeleteConfirmation, RawForm};
pub use validation::{BookFields, CleanedData, FieldValue, FormValidator, INVALID_CHOICE, INVALID_DATE, INVALID_EMAIL, REQUIRED};
