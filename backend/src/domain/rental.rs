//! Rental lifecycle state machine and billing rule.
//!
//! A rental starts `Active` and ends in exactly one of two terminal states:
//! `Completed` (billed) or `Cancelled` (free). There is no transition out of
//! a terminal state.
//!
//! ## Invariants
//! - `ended_at` is set iff the status is not `Active`.
//! - `total_cost_cents` is set iff the status is `Completed`, and equals
//!   [`billable_hours`] applied to the start/end timestamps times the bike's
//!   hourly rate captured at return time.
//! - `started_at` is fixed at creation and never edited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::UserId;

/// Lifecycle states of a rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    /// The bike is out with the user.
    Active,
    /// Returned and billed. Terminal.
    Completed,
    /// Abandoned without billing. Terminal.
    Cancelled,
}

impl std::fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{label}")
    }
}

impl std::str::FromStr for RentalStatus {
    type Err = RentalValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(RentalValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Settlement state of a rental's charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No charge attempted yet. Default.
    Pending,
    /// Charge settled.
    Paid,
    /// Charge attempted and declined.
    Failed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
        };
        write!(f, "{label}")
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = RentalValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            other => Err(RentalValidationError::UnknownPaymentStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validation errors raised when rehydrating or transitioning a rental.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RentalValidationError {
    /// An end timestamp on an active rental, or none on a closed one.
    #[error("ended_at must be set exactly when the rental is no longer active")]
    EndTimestampMismatch,
    /// A cost on anything other than a completed rental.
    #[error("total cost is only valid on completed rentals")]
    CostOnUnbilledRental,
    /// A transition was attempted on a rental outside the `Active` state.
    #[error("rental is {status}, not active")]
    NotActive {
        /// The state the rental was actually in.
        status: RentalStatus,
    },
    /// Status string outside the known set.
    #[error("unknown rental status: {value}")]
    UnknownStatus {
        /// The rejected input.
        value: String,
    },
    /// Payment status string outside the known set.
    #[error("unknown payment status: {value}")]
    UnknownPaymentStatus {
        /// The rejected input.
        value: String,
    },
}

/// Number of whole hours billed for the elapsed duration.
///
/// Any fractional hour, however small, rounds up to the next whole hour. A
/// zero or negative duration (clock skew between writer and reader) bills
/// the one-hour minimum rather than producing a degenerate zero-cost rental.
///
/// # Examples
/// ```
/// use backend::domain::billable_hours;
/// use chrono::{Duration, Utc};
///
/// let start = Utc::now();
/// assert_eq!(billable_hours(start, start + Duration::minutes(61)), 2);
/// assert_eq!(billable_hours(start, start + Duration::minutes(60)), 1);
/// assert_eq!(billable_hours(start, start + Duration::seconds(1)), 1);
/// ```
#[must_use]
pub fn billable_hours(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> i64 {
    const MILLIS_PER_HOUR: i64 = 3_600_000;
    let elapsed_ms = (ended_at - started_at).num_milliseconds();
    // Ceiling division toward +infinity; signed `div_ceil` is not yet stable.
    let hours = elapsed_ms.div_euclid(MILLIS_PER_HOUR)
        + i64::from(elapsed_ms.rem_euclid(MILLIS_PER_HOUR) != 0);
    hours.max(1)
}

/// Input payload for [`Rental::new`], used when rehydrating stored records.
#[derive(Debug, Clone)]
pub struct RentalDraft {
    pub id: Uuid,
    pub user_id: UserId,
    pub bike_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub total_cost_cents: Option<i64>,
    pub status: RentalStatus,
    pub payment_status: PaymentStatus,
}

/// A rental record and its lifecycle state machine.
///
/// Constructed either fresh via [`Rental::open`] or from storage via
/// [`Rental::new`]; both paths uphold the invariants documented on the
/// module. Records are never deleted — terminal rentals are history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rental {
    id: Uuid,
    user_id: UserId,
    bike_id: Uuid,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    total_cost_cents: Option<i64>,
    status: RentalStatus,
    payment_status: PaymentStatus,
}

impl Rental {
    /// Rehydrates a validated rental from stored attributes.
    pub fn new(draft: RentalDraft) -> Result<Self, RentalValidationError> {
        Self::try_from(draft)
    }

    /// Opens a new `Active` rental.
    ///
    /// Availability is deliberately not checked here; the coordinator owns
    /// the cross-entity precondition.
    #[must_use]
    pub fn open(user_id: UserId, bike_id: Uuid, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            bike_id,
            started_at,
            ended_at: None,
            total_cost_cents: None,
            status: RentalStatus::Active,
            payment_status: PaymentStatus::Pending,
        }
    }

    /// Closes the rental: `Active` → `Completed`, computing the charge.
    ///
    /// The charge is [`billable_hours`] between start and `ended_at` times
    /// `price_per_hour_cents` — the bike's rate as captured by the caller at
    /// return time. Payment stays `Pending` until
    /// [`Rental::record_payment`]; settling a charge is the payment
    /// gateway's trust boundary, not the state machine's.
    pub fn close(
        &mut self,
        ended_at: DateTime<Utc>,
        price_per_hour_cents: i64,
    ) -> Result<(), RentalValidationError> {
        self.require_active()?;
        self.total_cost_cents = Some(billable_hours(self.started_at, ended_at) * price_per_hour_cents);
        self.ended_at = Some(ended_at);
        self.status = RentalStatus::Completed;
        Ok(())
    }

    /// Cancels the rental: `Active` → `Cancelled`, no charge.
    ///
    /// `ended_at` records when the cancellation happened so the
    /// end-timestamp/status invariant holds for terminal records.
    pub fn cancel(&mut self, ended_at: DateTime<Utc>) -> Result<(), RentalValidationError> {
        self.require_active()?;
        self.ended_at = Some(ended_at);
        self.status = RentalStatus::Cancelled;
        Ok(())
    }

    /// Records the outcome of a settlement attempt.
    pub fn record_payment(&mut self, outcome: PaymentStatus) {
        self.payment_status = outcome;
    }

    fn require_active(&self) -> Result<(), RentalValidationError> {
        if self.status == RentalStatus::Active {
            Ok(())
        } else {
            Err(RentalValidationError::NotActive {
                status: self.status,
            })
        }
    }

    /// Returns the rental id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the renting user's id.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the rented bike's id.
    pub fn bike_id(&self) -> Uuid {
        self.bike_id
    }

    /// Returns the start timestamp.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns the end timestamp, absent while `Active`.
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Returns the charge in minor units, absent until `Completed`.
    pub fn total_cost_cents(&self) -> Option<i64> {
        self.total_cost_cents
    }

    /// Returns the lifecycle status.
    pub fn status(&self) -> RentalStatus {
        self.status
    }

    /// Returns the settlement status.
    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    /// True while the rental holds its bike.
    pub fn is_active(&self) -> bool {
        self.status == RentalStatus::Active
    }
}

impl TryFrom<RentalDraft> for Rental {
    type Error = RentalValidationError;

    fn try_from(value: RentalDraft) -> Result<Self, Self::Error> {
        let closed = value.status != RentalStatus::Active;
        if value.ended_at.is_some() != closed {
            return Err(RentalValidationError::EndTimestampMismatch);
        }
        if value.total_cost_cents.is_some() && value.status != RentalStatus::Completed {
            return Err(RentalValidationError::CostOnUnbilledRental);
        }
        Ok(Self {
            id: value.id,
            user_id: value.user_id,
            bike_id: value.bike_id,
            started_at: value.started_at,
            ended_at: value.ended_at,
            total_cost_cents: value.total_cost_cents,
            status: value.status,
            payment_status: value.payment_status,
        })
    }
}
