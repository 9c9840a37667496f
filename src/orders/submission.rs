//! Submission Coordinator
//!
//! Turns the cart into an order, hands it to an [`OrderTransport`] and
//! reacts to the answer: a confirmed order empties the cart, anything else
//! leaves it intact so the customer can try again.

use jiff::Timestamp;
use rand::Rng;
use thiserror::Error;
use tracing::{Span, info, warn};

use crate::{
    cart::CartEngine,
    orders::{
        CONFIRMED_MESSAGE, DiningMode, FAILED_MESSAGE, OrderPayload, OrderResponse, OrderTransport,
        PostOrderDestination, TransportError,
    },
};

/// Lowest order number handed out.
pub const MIN_ORDER_NUMBER: u16 = 1;

/// Highest order number handed out.
pub const MAX_ORDER_NUMBER: u16 = 999;

/// Errors raised while submitting an order.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Nothing to order.
    #[error("the cart is empty")]
    EmptyCart,

    /// A submission is already waiting for an answer.
    #[error("an order is already being submitted")]
    InFlight,

    /// The order never reached the backend, or it answered with an error status.
    #[error("failed to send order: {0}")]
    Transport(#[from] TransportError),

    /// The backend answered but refused the order.
    #[error("the order was refused")]
    Rejected,

    /// An answer arrived while no submission was waiting for one.
    #[error("no order is being submitted")]
    NotSubmitting,
}

impl SubmissionError {
    /// Whether the customer may simply try again with the same cart.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Rejected)
    }
}

/// Where a submission stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
    /// Nothing submitted, or the last outcome was dismissed
    #[default]
    Idle,

    /// Waiting for the backend
    Submitting,

    /// The backend accepted the order
    Confirmed,

    /// The order could not be placed
    Failed,
}

/// Submission Coordinator
#[derive(Debug, Clone)]
pub struct SubmissionCoordinator {
    state: SubmissionState,
    order_number: u16,
}

impl SubmissionCoordinator {
    /// Create a coordinator that will submit under `order_number`.
    #[must_use]
    pub fn new(order_number: u16) -> Self {
        Self {
            state: SubmissionState::Idle,
            order_number,
        }
    }

    /// Create a coordinator with an order number drawn at random.
    #[must_use]
    pub fn with_random_order_number() -> Self {
        Self::new(rand::thread_rng().gen_range(MIN_ORDER_NUMBER..=MAX_ORDER_NUMBER))
    }

    /// Current state.
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Number shown to the customer.
    pub fn order_number(&self) -> u16 {
        self.order_number
    }

    /// Message to surface for the current state, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self.state {
            SubmissionState::Confirmed => Some(CONFIRMED_MESSAGE),
            SubmissionState::Failed => Some(FAILED_MESSAGE),
            SubmissionState::Idle | SubmissionState::Submitting => None,
        }
    }

    /// Snapshot the cart into a payload and enter `Submitting`.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::InFlight`] while a submission is pending and
    /// [`SubmissionError::EmptyCart`] if there is nothing to order. The state is
    /// unchanged in both cases.
    pub fn begin(&mut self, cart: &CartEngine) -> Result<OrderPayload, SubmissionError> {
        if self.state == SubmissionState::Submitting {
            return Err(SubmissionError::InFlight);
        }

        if cart.cart().is_empty() {
            return Err(SubmissionError::EmptyCart);
        }

        self.state = SubmissionState::Submitting;

        Ok(OrderPayload::new(
            self.order_number,
            Timestamp::now(),
            cart.cart(),
        ))
    }

    /// Interpret the transport's answer.
    ///
    /// An accepted order discards the cart along with its persisted copy.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::Rejected`] or [`SubmissionError::Transport`]
    /// when the order wasn't placed; the cart is left as it was.
    /// Returns [`SubmissionError::NotSubmitting`] unless [`Self::begin`] ran
    /// first; the state and cart are untouched.
    pub fn complete(
        &mut self,
        cart: &mut CartEngine,
        result: Result<OrderResponse, TransportError>,
    ) -> Result<(), SubmissionError> {
        if self.state != SubmissionState::Submitting {
            warn!(state = ?self.state, "ignoring order answer outside a submission");

            return Err(SubmissionError::NotSubmitting);
        }

        match result {
            Ok(OrderResponse { success: true }) => {
                self.state = SubmissionState::Confirmed;

                cart.discard();

                info!(order_number = self.order_number, "order confirmed");

                Ok(())
            }
            Ok(OrderResponse { success: false }) => {
                self.state = SubmissionState::Failed;

                warn!(order_number = self.order_number, "order refused");

                Err(SubmissionError::Rejected)
            }
            Err(err) => {
                self.state = SubmissionState::Failed;

                warn!(order_number = self.order_number, error = %err, "order failed");

                Err(err.into())
            }
        }
    }

    /// Submit the cart through `transport`, once.
    ///
    /// # Errors
    ///
    /// See [`Self::begin`] and [`Self::complete`].
    #[tracing::instrument(
        name = "orders.submit",
        skip_all,
        fields(order_number = self.order_number, lines = tracing::field::Empty)
    )]
    pub async fn submit(
        &mut self,
        cart: &mut CartEngine,
        transport: &dyn OrderTransport,
    ) -> Result<(), SubmissionError> {
        let payload = self.begin(cart)?;

        Span::current().record("lines", payload.lines.len());

        let result = transport.send(&payload).await;

        self.complete(cart, result)
    }

    /// Dismiss the outcome message.
    ///
    /// After a confirmed order this yields the screen to navigate to; after a
    /// failure it only returns to `Idle`. While submitting it does nothing.
    pub fn close_confirmation(&mut self, mode: DiningMode) -> Option<PostOrderDestination> {
        match self.state {
            SubmissionState::Confirmed => {
                self.state = SubmissionState::Idle;

                Some(mode.into())
            }
            SubmissionState::Failed => {
                self.state = SubmissionState::Idle;

                None
            }
            SubmissionState::Idle | SubmissionState::Submitting => None,
        }
    }
}
