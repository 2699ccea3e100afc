//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`
//! exactly. `diesel print-schema` can regenerate them from a live database.

diesel::table! {
    /// User directory records.
    ///
    /// `email` carries the `users_email_key` unique constraint and is stored
    /// lowercased.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Trimmed, non-empty display name.
        name -> Text,
        /// Optional non-negative age.
        age -> Nullable<Int4>,
        /// Trimmed, lowercased, unique email address.
        email -> Text,
        /// Optional free-form address.
        address -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}
