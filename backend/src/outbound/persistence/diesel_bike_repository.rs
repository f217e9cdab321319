//! PostgreSQL-backed `BikeRepository` implementation using Diesel.
//!
//! The conditional availability write is the load-bearing piece: a single
//! `UPDATE ... WHERE available = expected` whose row count distinguishes an
//! applied claim from a raced or missing one, atomic at the database even
//! across processes.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{
    AvailabilityWrite, BikeFilter, BikeRepository, BikeRepositoryError,
};
use crate::domain::{Bike, BikeCategory, BikeDraft};

use super::error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{BikeRow, BikeUpdate, NewBikeRow};
use super::pool::{DbPool, PoolError};
use super::schema::bikes;

/// Diesel-backed implementation of the bike repository port.
#[derive(Clone)]
pub struct DieselBikeRepository {
    pool: DbPool,
}

impl DieselBikeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BikeRepositoryError {
    map_basic_pool_error(error, BikeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BikeRepositoryError {
    map_basic_diesel_error(
        error,
        BikeRepositoryError::query,
        BikeRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain bike.
fn row_to_bike(row: BikeRow) -> Result<Bike, BikeRepositoryError> {
    let category: BikeCategory = row
        .category
        .parse()
        .map_err(|err: crate::domain::BikeValidationError| {
            BikeRepositoryError::query(err.to_string())
        })?;
    Bike::new(BikeDraft {
        id: row.id,
        name: row.name,
        category,
        price_per_hour_cents: row.price_per_hour_cents,
        available: row.available,
        description: row.description,
        features: row.features,
        location: row.location,
        image: row.image,
    })
    .map_err(|err| BikeRepositoryError::query(err.to_string()))
}

#[async_trait]
impl BikeRepository for DieselBikeRepository {
    async fn insert(&self, bike: &Bike) -> Result<(), BikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewBikeRow {
            id: bike.id(),
            name: bike.name(),
            category: bike.category().to_string(),
            price_per_hour_cents: bike.price_per_hour_cents(),
            available: bike.is_available(),
            description: bike.description(),
            features: bike.features(),
            location: bike.location(),
            image: bike.image(),
        };
        diesel::insert_into(bikes::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(&self, bike: &Bike) -> Result<bool, BikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = BikeUpdate {
            name: bike.name(),
            category: bike.category().to_string(),
            price_per_hour_cents: bike.price_per_hour_cents(),
            available: bike.is_available(),
            description: bike.description(),
            features: bike.features(),
            location: bike.location(),
            image: bike.image(),
        };
        let updated = diesel::update(bikes::table.find(bike.id()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, bike_id: &Uuid) -> Result<bool, BikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(bikes::table.find(bike_id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find_by_id(&self, bike_id: &Uuid) -> Result<Option<Bike>, BikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<BikeRow> = bikes::table
            .find(bike_id)
            .select(BikeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_bike).transpose()
    }

    async fn list(&self, filter: &BikeFilter) -> Result<Vec<Bike>, BikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = bikes::table
            .select(BikeRow::as_select())
            .order(bikes::created_at.desc())
            .into_boxed();
        if let Some(category) = filter.category {
            query = query.filter(bikes::category.eq(category.to_string()));
        }
        if filter.only_available {
            query = query.filter(bikes::available.eq(true));
        }
        let rows: Vec<BikeRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_bike).collect()
    }

    async fn compare_and_set_available(
        &self,
        bike_id: &Uuid,
        expected: bool,
        available: bool,
    ) -> Result<AvailabilityWrite, BikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            bikes::table
                .find(bike_id)
                .filter(bikes::available.eq(expected)),
        )
        .set(bikes::available.eq(available))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        if updated > 0 {
            return Ok(AvailabilityWrite::Applied);
        }
        // Zero rows: either the flag raced or the bike is gone.
        let exists: Option<Uuid> = bikes::table
            .find(bike_id)
            .select(bikes::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(if exists.is_some() {
            AvailabilityWrite::Raced
        } else {
            AvailabilityWrite::Missing
        })
    }

    async fn set_available(
        &self,
        bike_id: &Uuid,
        available: bool,
    ) -> Result<bool, BikeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(bikes::table.find(bike_id))
            .set(bikes::available.eq(available))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
