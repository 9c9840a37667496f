//! Orders
//!
//! Everything that happens once the customer presses "pay": the payload sent
//! to the backend, the transport that carries it and the coordinator that
//! reacts to the outcome.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLine};

pub mod submission;
pub mod transport;

pub use submission::{SubmissionCoordinator, SubmissionError, SubmissionState};
pub use transport::{HttpOrderTransport, MockOrderTransport, OrderTransport, TransportError};

/// Message shown once the backend accepted the order.
pub const CONFIRMED_MESSAGE: &str = "Your order has been placed.";

/// Message shown when the order could not be placed.
pub const FAILED_MESSAGE: &str = "An error occurred. Please try again.";

/// Whether the customer eats in or takes the order away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DiningMode {
    /// Eat in; the default when nothing was chosen
    #[default]
    DineIn,

    /// Take away
    Takeaway,
}

impl DiningMode {
    /// Interpret the free-text label stored by the welcome screen.
    ///
    /// Only takeaway labels are recognised; anything else means dine-in.
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase();

        let takeaway = matches!(
            normalized.as_str(),
            "à emporter" | "a emporter" | "emporter" | "takeaway" | "take away"
        );

        if takeaway {
            Self::Takeaway
        } else {
            Self::DineIn
        }
    }

    /// Label stored for this mode.
    pub fn label(self) -> &'static str {
        match self {
            Self::DineIn => "Sur place",
            Self::Takeaway => "À emporter",
        }
    }
}

/// Screen to show after the confirmation is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOrderDestination {
    /// Thank-you screen, for takeaway orders
    ThankYou,

    /// Table-tent number screen, for dine-in orders
    TableTent,
}

impl From<DiningMode> for PostOrderDestination {
    fn from(mode: DiningMode) -> Self {
        match mode {
            DiningMode::Takeaway => Self::ThankYou,
            DiningMode::DineIn => Self::TableTent,
        }
    }
}

/// Body of the order submission request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    /// Number shown to the customer
    pub order_number: u16,

    /// When the order was placed
    pub placed_at: Timestamp,

    /// Snapshot of the cart lines
    pub lines: Vec<CartLine>,

    /// Formatted total, as displayed
    pub total: String,
}

impl OrderPayload {
    /// Snapshot `cart` into a payload.
    pub fn new(order_number: u16, placed_at: Timestamp, cart: &Cart) -> Self {
        Self {
            order_number,
            placed_at,
            lines: cart.lines().to_vec(),
            total: cart.formatted_total(),
        }
    }
}

/// What the backend answers to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    /// Whether the order was accepted
    pub success: bool,
}
