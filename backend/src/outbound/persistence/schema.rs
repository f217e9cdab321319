//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match the migrations exactly; regenerate with
//! `diesel print-schema` after schema changes.

diesel::table! {
    /// Registered accounts and their credential digests.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name.
        name -> Varchar,
        /// Login email, stored lowercased, unique.
        email -> Varchar,
        /// Contact phone number, possibly empty.
        phone -> Varchar,
        /// Capability label: `user` or `admin`.
        role -> Varchar,
        /// Salted password hash, `salt$digest` hex.
        password_digest -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// The bike catalogue.
    bikes (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name.
        name -> Varchar,
        /// Catalogue category label.
        category -> Varchar,
        /// Hourly rate in integer minor units.
        price_per_hour_cents -> Int8,
        /// Availability flag; owned by the rental coordinator.
        available -> Bool,
        /// Free-text description.
        description -> Text,
        /// Feature tags in listing order.
        features -> Array<Text>,
        /// Location label.
        location -> Varchar,
        /// Image path.
        image -> Varchar,
        /// Record creation timestamp; listing order is newest first.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Rental records, one row per lifecycle.
    rentals (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Renting account.
        user_id -> Uuid,
        /// Rented bike.
        bike_id -> Uuid,
        /// When the rental opened.
        started_at -> Timestamptz,
        /// When the rental closed; set iff the status is terminal.
        ended_at -> Nullable<Timestamptz>,
        /// Charge in integer minor units; set iff completed.
        total_cost_cents -> Nullable<Int8>,
        /// Lifecycle status label: `active`, `completed`, `cancelled`.
        status -> Varchar,
        /// Settlement status label: `pending`, `paid`, `failed`.
        payment_status -> Varchar,
        /// Record creation timestamp; listing order is newest first.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(rentals -> users (user_id));
diesel::joinable!(rentals -> bikes (bike_id));

diesel::allow_tables_to_appear_in_same_query!(users, bikes, rentals);
