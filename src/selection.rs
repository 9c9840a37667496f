//! Selection
//!
//! State machines for the multi-step modal flows: composing a menu
//! (variant, side, drink) and sizing a standalone drink. Nothing reaches the
//! cart until a flow commits; every flow can be reset at any point.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{cart::LineOptions, pricing::LARGE_DRINK_SURCHARGE};

pub mod drink;
pub mod menu;
pub mod quantity;

pub use drink::{DrinkDraft, DrinkEvent, DrinkFlow, DrinkOutcome, DrinkStep};
pub use menu::{
    MenuDraft, MenuEvent, MenuFlow, MenuOutcome, MenuSelected, MenuStep, MenuVariant, Side,
};
pub use quantity::QuantityCounter;

/// Errors raised by selection flows. All of them leave the cart untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The flow was driven without an item being opened first.
    #[error("no {0} selection is in progress")]
    NoActiveDraft(&'static str),

    /// A later step was attempted before an earlier one was chosen.
    #[error("selection incomplete: no {0} chosen")]
    StepIncomplete(&'static str),

    /// The cart refused the line because its quantity was zero.
    #[error("nothing to add: the quantity is zero")]
    NothingToAdd,

    /// The event isn't valid in the flow's current step.
    #[error("cannot {event} from step {step}")]
    InvalidTransition {
        /// Current step
        step: &'static str,

        /// Rejected event
        event: &'static str,
    },
}

/// Drink size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrinkSize {
    /// 30 cl
    Small,

    /// 50 cl
    Large,
}

impl DrinkSize {
    /// Label shown to the customer and stored as a line option.
    pub fn label(self) -> &'static str {
        match self {
            Self::Small => "30 cl",
            Self::Large => "50 cl",
        }
    }

    /// Price added to a standalone drink of this size.
    pub fn surcharge(self) -> Decimal {
        match self {
            Self::Small => Decimal::ZERO,
            Self::Large => LARGE_DRINK_SURCHARGE,
        }
    }
}

/// A finished selection, ready to be added to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedLine {
    /// Display name of the line
    pub name: String,

    /// Final unit price, surcharges included
    pub unit_price: Decimal,

    /// Option labels in the order they were chosen
    pub options: LineOptions,

    /// Number of units
    pub quantity: u32,
}

pub(crate) fn options_from<'a>(labels: impl IntoIterator<Item = &'a str>) -> LineOptions {
    labels.into_iter().map(ToString::to_string).collect()
}
