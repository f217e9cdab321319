//! PostgreSQL-backed `RentalRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{RentalFilter, RentalRepository, RentalRepositoryError};
use crate::domain::{PaymentStatus, Rental, RentalDraft, RentalStatus, UserId};

use super::error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewRentalRow, RentalRow, RentalUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::rentals;

/// Diesel-backed implementation of the rental repository port.
#[derive(Clone)]
pub struct DieselRentalRepository {
    pool: DbPool,
}

impl DieselRentalRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RentalRepositoryError {
    map_basic_pool_error(error, RentalRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RentalRepositoryError {
    map_basic_diesel_error(
        error,
        RentalRepositoryError::query,
        RentalRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain rental.
fn row_to_rental(row: RentalRow) -> Result<Rental, RentalRepositoryError> {
    let status: RentalStatus = row
        .status
        .parse()
        .map_err(|err: crate::domain::RentalValidationError| {
            RentalRepositoryError::query(err.to_string())
        })?;
    let payment_status: PaymentStatus = row
        .payment_status
        .parse()
        .map_err(|err: crate::domain::RentalValidationError| {
            RentalRepositoryError::query(err.to_string())
        })?;
    Rental::new(RentalDraft {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        bike_id: row.bike_id,
        started_at: row.started_at,
        ended_at: row.ended_at,
        total_cost_cents: row.total_cost_cents,
        status,
        payment_status,
    })
    .map_err(|err| RentalRepositoryError::query(err.to_string()))
}

fn to_new_row(rental: &Rental) -> NewRentalRow {
    NewRentalRow {
        id: rental.id(),
        user_id: *rental.user_id().as_uuid(),
        bike_id: rental.bike_id(),
        started_at: rental.started_at(),
        ended_at: rental.ended_at(),
        total_cost_cents: rental.total_cost_cents(),
        status: rental.status().to_string(),
        payment_status: rental.payment_status().to_string(),
    }
}

#[async_trait]
impl RentalRepository for DieselRentalRepository {
    async fn insert(&self, rental: &Rental) -> Result<(), RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(rentals::table)
            .values(to_new_row(rental))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(&self, rental: &Rental) -> Result<bool, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = RentalUpdate {
            ended_at: rental.ended_at(),
            total_cost_cents: rental.total_cost_cents(),
            status: rental.status().to_string(),
            payment_status: rental.payment_status().to_string(),
        };
        let updated = diesel::update(rentals::table.find(rental.id()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn find_by_id(&self, rental_id: &Uuid) -> Result<Option<Rental>, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RentalRow> = rentals::table
            .find(rental_id)
            .select(RentalRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_rental).transpose()
    }

    async fn find_active_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Rental>, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RentalRow> = rentals::table
            .filter(rentals::user_id.eq(user_id.as_uuid()))
            .filter(rentals::status.eq(RentalStatus::Active.to_string()))
            .select(RentalRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_rental).transpose()
    }

    async fn list(&self, filter: &RentalFilter) -> Result<Vec<Rental>, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = rentals::table
            .select(RentalRow::as_select())
            .order(rentals::created_at.desc())
            .into_boxed();
        if let Some(status) = filter.status {
            query = query.filter(rentals::status.eq(status.to_string()));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(rentals::user_id.eq(*user_id.as_uuid()));
        }
        let rows: Vec<RentalRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_rental).collect()
    }
}
