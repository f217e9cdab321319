//! Startup fixtures behind the `example-data` feature.
//!
//! Seeds a small, recognisable data set for demos and local development: an
//! admin account, two rider accounts, and a starter fleet. Seeding is
//! skipped when the store already holds any account, so restarting a
//! persistent deployment never duplicates the fleet.

use tracing::info;

use crate::domain::auth::encode_digest;
use crate::domain::ports::{BikeRepository, UserRecord, UserRepository};
use crate::domain::{Bike, BikeCategory, BikeDraft, Error, Role, User, UserDraft, UserId};

struct Account {
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    role: Role,
    password: &'static str,
}

const ACCOUNTS: &[Account] = &[
    Account {
        name: "Admin User",
        email: "admin@bikerent.com",
        phone: "+1234567890",
        role: Role::Admin,
        password: "admin123",
    },
    Account {
        name: "John Doe",
        email: "john@example.com",
        phone: "+1234567891",
        role: Role::User,
        password: "password123",
    },
    Account {
        name: "Jane Smith",
        email: "jane@example.com",
        phone: "+1234567892",
        role: Role::User,
        password: "password123",
    },
];

fn fleet() -> Result<Vec<Bike>, Error> {
    let listings = [
        (
            "Mountain Explorer",
            BikeCategory::Supersport,
            1500,
            "Perfect for off-road adventures and mountain trails.",
            &["21-speed gear", "Shock absorbers", "All-terrain tires"][..],
            "Main Station",
        ),
        (
            "City Cruiser",
            BikeCategory::Naked,
            1200,
            "Comfortable bike for city commuting and leisure rides.",
            &["7-speed gear", "Comfortable seat", "LED lights"][..],
            "Downtown Station",
        ),
        (
            "Speed Demon",
            BikeCategory::Tourer,
            1800,
            "Lightweight road bike for speed enthusiasts.",
            &["16-speed gear", "Carbon frame", "Racing handlebars"][..],
            "Sports Center",
        ),
        (
            "Electric Glide",
            BikeCategory::Twostroke,
            2500,
            "Electric bike with pedal assist for effortless rides.",
            &["Electric motor", "50km range", "USB charging port"][..],
            "Tech Hub",
        ),
        (
            "Urban Rider",
            BikeCategory::Supersport,
            1400,
            "Versatile bike perfect for urban environments.",
            &["8-speed gear", "Basket included", "Puncture-resistant tires"][..],
            "City Center",
        ),
        (
            "Trail Blazer",
            BikeCategory::Supersport,
            1600,
            "Rugged supersport bike for challenging terrains.",
            &["24-speed gear", "Disc brakes", "Suspension fork"][..],
            "Adventure Park",
        ),
    ];

    listings
        .into_iter()
        .map(
            |(name, category, price_per_hour_cents, description, features, location)| {
                let mut draft = BikeDraft::listed(
                    name.to_owned(),
                    category,
                    price_per_hour_cents,
                    description.to_owned(),
                );
                draft.features = features.iter().map(|&feature| feature.to_owned()).collect();
                draft.location = location.to_owned();
                Bike::new(draft)
                    .map_err(|err| Error::internal(format!("invalid example bike: {err}")))
            },
        )
        .collect()
}

/// Seed the example accounts and fleet unless the store already has users.
pub async fn seed_example_data(
    users: &dyn UserRepository,
    bikes: &dyn BikeRepository,
) -> Result<(), Error> {
    let existing = users
        .count()
        .await
        .map_err(|err| Error::internal(format!("seeding aborted: {err}")))?;
    if existing > 0 {
        info!(existing, "store already holds accounts; example data skipped");
        return Ok(());
    }

    for account in ACCOUNTS {
        let user = User::new(UserDraft {
            id: UserId::random(),
            name: account.name.to_owned(),
            email: account.email.to_owned(),
            phone: account.phone.to_owned(),
            role: account.role,
        })
        .map_err(|err| Error::internal(format!("invalid example account: {err}")))?;
        let record = UserRecord {
            user,
            password_digest: encode_digest(account.password),
        };
        users
            .insert(&record)
            .await
            .map_err(|err| Error::internal(format!("failed to seed account: {err}")))?;
    }

    let fleet = fleet()?;
    for bike in &fleet {
        bikes
            .insert(bike)
            .await
            .map_err(|err| Error::internal(format!("failed to seed bike: {err}")))?;
    }
    info!(
        accounts = ACCOUNTS.len(),
        bikes = fleet.len(),
        "example data seeded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::BikeFilter;
    use crate::outbound::memory::{InMemoryBikeRepository, InMemoryUserRepository};

    #[tokio::test]
    async fn seeds_accounts_and_fleet_once() {
        let users = InMemoryUserRepository::new();
        let bikes = InMemoryBikeRepository::new();

        seed_example_data(&users, &bikes).await.expect("first seed");
        seed_example_data(&users, &bikes)
            .await
            .expect("repeat seed");

        assert_eq!(users.count().await.expect("count"), 3);
        let fleet = bikes
            .list(&BikeFilter::default())
            .await
            .expect("fleet listed");
        assert_eq!(fleet.len(), 6);
        assert!(fleet.iter().all(Bike::is_available));
    }

    #[tokio::test]
    async fn seeded_admin_can_authenticate() {
        use std::sync::Arc;

        use crate::domain::AuthService;
        use crate::domain::ports::{AccountService, Credentials};

        let users = Arc::new(InMemoryUserRepository::new());
        let bikes = InMemoryBikeRepository::new();
        seed_example_data(users.as_ref(), &bikes)
            .await
            .expect("seeded");

        let auth = AuthService::new(Arc::clone(&users));
        let admin = auth
            .authenticate(Credentials {
                email: "admin@bikerent.com".to_owned(),
                password: "admin123".to_owned(),
            })
            .await
            .expect("admin logs in");
        assert!(admin.is_admin());
    }
}
