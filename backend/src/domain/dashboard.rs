//! Admin dashboard rollup.
//!
//! Read-only aggregates over the stores; nothing here touches the rental
//! lifecycle.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::{
    BikeFilter, BikeRepository, BikeRepositoryError, DashboardQuery, RentalFilter,
    RentalRepository, RentalRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{BikeCategory, Error, Rental, RentalStatus};

/// How many rentals the "recent activity" panel shows.
const RECENT_RENTALS_LIMIT: usize = 10;

/// Headline counts for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub total_users: u64,
    pub total_bikes: u64,
    pub available_bikes: u64,
    pub active_rentals: u64,
    pub completed_rentals: u64,
}

/// Revenue over completed rentals, in integer minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    pub total_cents: i64,
    pub average_cents: i64,
}

/// Bike count for one catalogue category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: BikeCategory,
    pub count: u64,
}

/// The full dashboard snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub overview: DashboardOverview,
    pub revenue: RevenueSummary,
    pub bikes_by_category: Vec<CategoryBreakdown>,
    /// Carried for the HTTP layer to render with its rental schema;
    /// excluded from direct serialisation.
    #[serde(skip)]
    #[schema(ignore)]
    pub recent_rentals: Vec<Rental>,
}

fn map_bike_repository_error(error: BikeRepositoryError) -> Error {
    match error {
        BikeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("bike repository unavailable: {message}"))
        }
        BikeRepositoryError::Query { message } => {
            Error::internal(format!("bike repository error: {message}"))
        }
    }
}

fn map_rental_repository_error(error: RentalRepositoryError) -> Error {
    match error {
        RentalRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("rental repository unavailable: {message}"))
        }
        RentalRepositoryError::Query { message } => {
            Error::internal(format!("rental repository error: {message}"))
        }
    }
}

fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateEmail { email } => {
            Error::internal(format!("unexpected duplicate email during read: {email}"))
        }
    }
}

/// Aggregator over the three stores.
pub struct DashboardService<B, R, U> {
    bikes: Arc<B>,
    rentals: Arc<R>,
    users: Arc<U>,
}

impl<B, R, U> DashboardService<B, R, U>
where
    B: BikeRepository,
    R: RentalRepository,
    U: UserRepository,
{
    /// Create an aggregator over the given stores.
    pub fn new(bikes: Arc<B>, rentals: Arc<R>, users: Arc<U>) -> Self {
        Self {
            bikes,
            rentals,
            users,
        }
    }
}

#[async_trait]
impl<B, R, U> DashboardQuery for DashboardService<B, R, U>
where
    B: BikeRepository,
    R: RentalRepository,
    U: UserRepository,
{
    async fn stats(&self) -> Result<DashboardStats, Error> {
        let bikes = self
            .bikes
            .list(&BikeFilter::default())
            .await
            .map_err(map_bike_repository_error)?;
        let rentals = self
            .rentals
            .list(&RentalFilter::default())
            .await
            .map_err(map_rental_repository_error)?;
        let total_users = self
            .users
            .count()
            .await
            .map_err(map_user_repository_error)?;

        let available_bikes = bikes.iter().filter(|bike| bike.is_available()).count() as u64;
        let active_rentals = rentals
            .iter()
            .filter(|rental| rental.status() == RentalStatus::Active)
            .count() as u64;
        let completed: Vec<&Rental> = rentals
            .iter()
            .filter(|rental| rental.status() == RentalStatus::Completed)
            .collect();
        let total_cents: i64 = completed
            .iter()
            .filter_map(|rental| rental.total_cost_cents())
            .sum();
        let average_cents = if completed.is_empty() {
            0
        } else {
            total_cents / completed.len() as i64
        };

        let bikes_by_category = BikeCategory::ALL
            .into_iter()
            .map(|category| CategoryBreakdown {
                category,
                count: bikes
                    .iter()
                    .filter(|bike| bike.category() == category)
                    .count() as u64,
            })
            .collect();

        // The repository lists newest first, so a prefix is the recent set.
        let recent_rentals = rentals
            .iter()
            .take(RECENT_RENTALS_LIMIT)
            .cloned()
            .collect();

        Ok(DashboardStats {
            overview: DashboardOverview {
                total_users,
                total_bikes: bikes.len() as u64,
                available_bikes,
                active_rentals,
                completed_rentals: completed.len() as u64,
            },
            revenue: RevenueSummary {
                total_cents,
                average_cents,
            },
            bikes_by_category,
            recent_rentals,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Aggregation against the in-memory stores.

    use chrono::{Duration, Utc};

    use super::*;
    use crate::domain::ports::UserRecord;
    use crate::domain::{BikeDraft, User, UserDraft, UserId};
    use crate::outbound::memory::{
        InMemoryBikeRepository, InMemoryRentalRepository, InMemoryUserRepository,
    };

    fn bike(category: BikeCategory, available: bool) -> crate::domain::Bike {
        let mut draft = BikeDraft::listed(
            "Test bike".to_owned(),
            category,
            1000,
            "A bike".to_owned(),
        );
        draft.available = available;
        crate::domain::Bike::new(draft).expect("valid draft")
    }

    fn user(email: &str) -> UserRecord {
        let user = User::new(UserDraft {
            id: UserId::random(),
            name: "Dana".to_owned(),
            email: email.to_owned(),
            phone: "+44 7700 900123".to_owned(),
            role: crate::domain::Role::User,
        })
        .expect("valid user");
        UserRecord {
            user,
            password_digest: "salt$digest".to_owned(),
        }
    }

    #[tokio::test]
    async fn empty_stores_produce_zeroed_stats() {
        let service = DashboardService::new(
            Arc::new(InMemoryBikeRepository::new()),
            Arc::new(InMemoryRentalRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
        );

        let stats = service.stats().await.expect("stats succeed");
        assert_eq!(stats.overview.total_bikes, 0);
        assert_eq!(stats.revenue.total_cents, 0);
        assert_eq!(stats.revenue.average_cents, 0);
        assert!(stats.recent_rentals.is_empty());
        assert_eq!(stats.bikes_by_category.len(), BikeCategory::ALL.len());
    }

    #[tokio::test]
    async fn stats_roll_up_counts_revenue_and_categories() {
        let bikes = Arc::new(InMemoryBikeRepository::new());
        let rentals = Arc::new(InMemoryRentalRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());

        let naked = bike(BikeCategory::Naked, false);
        let tourer = bike(BikeCategory::Tourer, true);
        bikes.insert(&naked).await.expect("insert bike");
        bikes.insert(&tourer).await.expect("insert bike");
        users.insert(&user("a@example.com")).await.expect("insert user");
        users.insert(&user("b@example.com")).await.expect("insert user");

        let rider = UserId::random();
        let active = Rental::open(rider, naked.id(), Utc::now());
        rentals.insert(&active).await.expect("insert rental");
        let mut completed = Rental::open(
            UserId::random(),
            tourer.id(),
            Utc::now() - Duration::hours(2),
        );
        completed.close(Utc::now(), 1000).expect("close succeeds");
        rentals.insert(&completed).await.expect("insert rental");

        let service = DashboardService::new(bikes, rentals, users);
        let stats = service.stats().await.expect("stats succeed");

        assert_eq!(stats.overview.total_users, 2);
        assert_eq!(stats.overview.total_bikes, 2);
        assert_eq!(stats.overview.available_bikes, 1);
        assert_eq!(stats.overview.active_rentals, 1);
        assert_eq!(stats.overview.completed_rentals, 1);
        assert_eq!(stats.revenue.total_cents, 2000);
        assert_eq!(stats.revenue.average_cents, 2000);
        let naked_count = stats
            .bikes_by_category
            .iter()
            .find(|entry| entry.category == BikeCategory::Naked)
            .map(|entry| entry.count);
        assert_eq!(naked_count, Some(1));
        assert_eq!(stats.recent_rentals.len(), 2);
        // Newest insert first.
        assert_eq!(stats.recent_rentals[0].id(), completed.id());
    }
}
