//! Internal Diesel row structs for database operations.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain. Rehydration goes through the validated domain constructors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{bikes, rentals, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub password_digest: String,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub role: String,
    pub password_digest: &'a str,
}

/// Row struct for reading from the bikes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bikes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BikeRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price_per_hour_cents: i64,
    pub available: bool,
    pub description: String,
    pub features: Vec<String>,
    pub location: String,
    pub image: String,
    #[expect(dead_code, reason = "schema field; only used for listing order")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new bike records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bikes)]
pub(crate) struct NewBikeRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub category: String,
    pub price_per_hour_cents: i64,
    pub available: bool,
    pub description: &'a str,
    pub features: &'a [String],
    pub location: &'a str,
    pub image: &'a str,
}

/// Changeset struct for whole-record bike updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = bikes)]
pub(crate) struct BikeUpdate<'a> {
    pub name: &'a str,
    pub category: String,
    pub price_per_hour_cents: i64,
    pub available: bool,
    pub description: &'a str,
    pub features: &'a [String],
    pub location: &'a str,
    pub image: &'a str,
}

/// Row struct for reading from the rentals table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rentals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RentalRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bike_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub total_cost_cents: Option<i64>,
    pub status: String,
    pub payment_status: String,
    #[expect(dead_code, reason = "schema field; only used for listing order")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new rental records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rentals)]
pub(crate) struct NewRentalRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bike_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub total_cost_cents: Option<i64>,
    pub status: String,
    pub payment_status: String,
}

/// Changeset struct for closing or settling rentals.
///
/// `None` writes NULL rather than skipping the column, so a cancelled
/// rental's cost stays empty even if a stale value was present.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = rentals)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct RentalUpdate {
    pub ended_at: Option<DateTime<Utc>>,
    pub total_cost_cents: Option<i64>,
    pub status: String,
    pub payment_status: String,
}
