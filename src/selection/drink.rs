//! Drink Flow
//!
//! Standalone drinks: pick a size, pick a quantity, add to cart.

use rust_decimal::Decimal;
use tracing::info;

use crate::{
    cart::{CartEngine, LineId},
    selection::{CommittedLine, DrinkSize, QuantityCounter, SelectionError, options_from},
};

/// The drink being configured.
#[derive(Debug, Clone, PartialEq)]
pub struct DrinkDraft {
    /// Drink name as listed in the catalog
    pub name: String,

    /// Catalog price of the small size
    pub base_price: Decimal,
}

/// Where a drink flow stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrinkStep {
    /// No drink is open
    Closed,

    /// A drink is open but no size picked
    SizeUnchosen,

    /// A size is picked; ready to commit
    SizeChosen,
}

/// Events the presentation layer feeds into a [`DrinkFlow`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrinkEvent {
    /// A drink was picked from the catalog.
    Open {
        /// Drink name
        name: String,

        /// Drink price
        price: Decimal,
    },

    /// A size button was pressed.
    ChooseSize(DrinkSize),

    /// The "+" button was pressed.
    Increment,

    /// The "-" button was pressed.
    Decrement,

    /// The "add" button was pressed.
    Commit,

    /// The modal was closed.
    Cancel,
}

/// What a [`DrinkEvent`] led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrinkOutcome {
    /// The flow is at this step with this quantity.
    Step(DrinkStep, u32),

    /// The drink was added to the cart as this line.
    Committed(LineId),
}

/// Drink Flow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrinkFlow {
    draft: Option<DrinkDraft>,
    size: Option<DrinkSize>,
    quantity: QuantityCounter,
}

impl DrinkFlow {
    /// A closed flow.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current step.
    pub fn step(&self) -> DrinkStep {
        match (&self.draft, self.size) {
            (None, _) => DrinkStep::Closed,
            (Some(_), None) => DrinkStep::SizeUnchosen,
            (Some(_), Some(_)) => DrinkStep::SizeChosen,
        }
    }

    /// The open drink, if any.
    pub fn draft(&self) -> Option<&DrinkDraft> {
        self.draft.as_ref()
    }

    /// Picked size, if any.
    pub fn size(&self) -> Option<DrinkSize> {
        self.size
    }

    /// Current quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity.value()
    }

    /// Whether a drink is being configured.
    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    /// Start configuring `name`, discarding any drink already open.
    pub fn open(&mut self, name: impl Into<String>, base_price: Decimal) {
        self.reset();
        self.draft = Some(DrinkDraft {
            name: name.into(),
            base_price,
        });
    }

    /// Pick (or re-pick) the size.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::NoActiveDraft`] if no drink is open.
    pub fn choose_size(&mut self, size: DrinkSize) -> Result<DrinkStep, SelectionError> {
        self.ensure_open()?;

        self.size = Some(size);

        Ok(self.step())
    }

    /// Step the quantity up, stopping at the maximum.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::NoActiveDraft`] if no drink is open; the
    /// quantity is unchanged.
    pub fn increment(&mut self) -> Result<u32, SelectionError> {
        self.ensure_open()?;
        self.quantity.increment();

        Ok(self.quantity.value())
    }

    /// Step the quantity down, stopping at one.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::NoActiveDraft`] if no drink is open; the
    /// quantity is unchanged.
    pub fn decrement(&mut self) -> Result<u32, SelectionError> {
        self.ensure_open()?;
        self.quantity.decrement();

        Ok(self.quantity.value())
    }

    fn ensure_open(&self) -> Result<(), SelectionError> {
        if self.draft.is_none() {
            return Err(SelectionError::NoActiveDraft("drink"));
        }

        Ok(())
    }

    /// Build the cart line this drink would produce.
    ///
    /// # Errors
    ///
    /// Fails if no drink is open or no size is picked.
    pub fn finalize(&self) -> Result<CommittedLine, SelectionError> {
        let draft = self
            .draft
            .as_ref()
            .ok_or(SelectionError::NoActiveDraft("drink"))?;
        let size = self.size.ok_or(SelectionError::StepIncomplete("size"))?;

        Ok(CommittedLine {
            name: draft.name.clone(),
            unit_price: draft.base_price + size.surcharge(),
            options: options_from([size.label()]),
            quantity: self.quantity.value(),
        })
    }

    /// Add the configured drink to the cart and close the flow.
    ///
    /// # Errors
    ///
    /// Fails if no drink is open or no size is picked; the cart is left untouched.
    #[tracing::instrument(name = "drink.commit", skip_all)]
    pub fn commit(&mut self, cart: &mut CartEngine) -> Result<LineId, SelectionError> {
        let line = self.finalize()?;

        let id = cart
            .add(&line.name, line.unit_price, line.options, line.quantity)
            .ok_or(SelectionError::NothingToAdd)?;

        info!(line_id = %id, name = %line.name, quantity = line.quantity, "drink added to cart");

        self.reset();

        Ok(id)
    }

    /// Close the flow; the quantity goes back to one.
    pub fn reset(&mut self) {
        self.draft = None;
        self.size = None;
        self.quantity.reset();
    }

    /// Dispatch a presentation event to the matching transition.
    ///
    /// # Errors
    ///
    /// Propagates the error of the rejected transition.
    pub fn apply(
        &mut self,
        event: DrinkEvent,
        cart: &mut CartEngine,
    ) -> Result<DrinkOutcome, SelectionError> {
        match event {
            DrinkEvent::Open { name, price } => self.open(name, price),
            DrinkEvent::ChooseSize(size) => {
                self.choose_size(size)?;
            }
            DrinkEvent::Increment => {
                self.increment()?;
            }
            DrinkEvent::Decrement => {
                self.decrement()?;
            }
            DrinkEvent::Commit => return self.commit(cart).map(DrinkOutcome::Committed),
            DrinkEvent::Cancel => self.reset(),
        }

        Ok(DrinkOutcome::Step(self.step(), self.quantity()))
    }
}
