//! Kiosk Session
//!
//! One customer's visit: the cart, the two selection flows and the order
//! submission, wired together. Presentation code feeds [`KioskEvent`]s in
//! and reads a [`CartView`] back out.

use std::{fmt, sync::Arc};

use rusty_money::iso::Currency;
use serde::Serialize;
use tracing::debug;

use crate::{
    cart::{CartEngine, CartLine, CartListener, LineId, LineOptions},
    catalog::{CategoryKind, Product},
    orders::{
        DiningMode, OrderTransport, PostOrderDestination, SubmissionCoordinator, SubmissionError,
    },
    persistence::{CartRepository, PersistenceError, SessionRepository, Storage},
    selection::{
        DrinkEvent, DrinkFlow, DrinkOutcome, DrinkStep, MenuEvent, MenuFlow, MenuOutcome,
        MenuStep, SelectionError,
    },
};

/// Events the presentation layer sends to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum KioskEvent {
    /// A product tile was pressed.
    SelectProduct(Product),

    /// An event for the menu modal.
    Menu(MenuEvent),

    /// An event for the drink modal.
    Drink(DrinkEvent),

    /// A cart line's delete button was pressed.
    RemoveLine(LineId),

    /// The cart was emptied.
    ClearCart,

    /// The order outcome message was closed.
    CloseConfirmation,
}

/// What a [`KioskEvent`] led to.
#[derive(Debug, Clone, PartialEq)]
pub enum KioskOutcome {
    /// The menu modal moved to a step.
    MenuStep(MenuStep),

    /// The drink modal moved to a step, with its current quantity.
    DrinkStep(DrinkStep, u32),

    /// A line was added or had its quantity bumped.
    LineAdded(LineId),

    /// A remove request was handled; `false` if the line didn't exist.
    LineRemoved(bool),

    /// The cart was emptied.
    CartCleared,

    /// The order outcome message was closed, possibly with a screen to go to.
    ConfirmationClosed(Option<PostOrderDestination>),

    /// The event didn't fit the current state and was ignored.
    Rejected(SelectionError),
}

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    /// Cart lines, in display order
    pub lines: Vec<CartLine>,

    /// Formatted total
    pub total: String,

    /// Order outcome message, if one is showing
    pub status: Option<&'static str>,
}

/// Kiosk Session
pub struct KioskSession {
    cart: CartEngine,
    menu: MenuFlow,
    drink: DrinkFlow,
    submission: SubmissionCoordinator,
    session: SessionRepository,
    transport: Arc<dyn OrderTransport>,
}

impl fmt::Debug for KioskSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KioskSession")
            .field("cart", &self.cart)
            .field("menu", &self.menu)
            .field("drink", &self.drink)
            .field("submission", &self.submission)
            .finish_non_exhaustive()
    }
}

impl KioskSession {
    /// Assemble a session from its parts.
    pub fn new(
        cart: CartEngine,
        session: SessionRepository,
        submission: SubmissionCoordinator,
        transport: Arc<dyn OrderTransport>,
    ) -> Self {
        Self {
            cart,
            menu: MenuFlow::new(),
            drink: DrinkFlow::new(),
            submission,
            session,
            transport,
        }
    }

    /// Open a session over `storage`, picking up any persisted cart and
    /// drawing a fresh order number.
    pub fn restore(
        storage: Arc<dyn Storage>,
        currency: &'static Currency,
        listener: Arc<dyn CartListener>,
        transport: Arc<dyn OrderTransport>,
    ) -> Self {
        let cart = CartEngine::restore(
            CartRepository::new(Arc::clone(&storage)),
            currency,
            listener,
        );

        Self::new(
            cart,
            SessionRepository::new(storage),
            SubmissionCoordinator::with_random_order_number(),
            transport,
        )
    }

    /// The cart engine.
    pub fn cart(&self) -> &CartEngine {
        &self.cart
    }

    /// The menu flow.
    pub fn menu(&self) -> &MenuFlow {
        &self.menu
    }

    /// The drink flow.
    pub fn drink(&self) -> &DrinkFlow {
        &self.drink
    }

    /// The submission coordinator.
    pub fn submission(&self) -> &SubmissionCoordinator {
        &self.submission
    }

    /// The stored dine-in/takeaway choice.
    pub fn dining_mode(&self) -> DiningMode {
        self.session.dining_mode()
    }

    /// Store the dine-in/takeaway choice.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub fn set_dining_mode(&self, mode: DiningMode) -> Result<(), PersistenceError> {
        self.session.set_dining_mode(mode)
    }

    /// Route a product tile press by its category kind.
    ///
    /// Menus open the menu modal, drinks open the drink modal, anything else
    /// goes straight into the cart. Opening a modal closes the other one.
    pub fn select_product(&mut self, product: &Product) -> KioskOutcome {
        match product.kind {
            CategoryKind::Menus => {
                self.drink.reset();
                self.menu.open(product.name.as_str(), product.price);

                KioskOutcome::MenuStep(self.menu.step())
            }
            CategoryKind::Drinks => {
                self.menu.reset();
                self.drink.open(product.name.as_str(), product.price);

                KioskOutcome::DrinkStep(self.drink.step(), self.drink.quantity())
            }
            CategoryKind::Simple => {
                match self
                    .cart
                    .add(&product.name, product.price, LineOptions::new(), 1)
                {
                    Some(id) => KioskOutcome::LineAdded(id),
                    None => KioskOutcome::Rejected(SelectionError::NothingToAdd),
                }
            }
        }
    }

    /// Dispatch a presentation event.
    ///
    /// Rejected selection events are logged and reported back as
    /// [`KioskOutcome::Rejected`]; they never touch the cart.
    pub fn dispatch(&mut self, event: KioskEvent) -> KioskOutcome {
        let result = match event {
            KioskEvent::SelectProduct(product) => return self.select_product(&product),
            KioskEvent::Menu(event) => {
                if matches!(event, MenuEvent::Open { .. }) {
                    self.drink.reset();
                }

                self.menu.apply(event, &mut self.cart).map(|outcome| match outcome {
                    MenuOutcome::Step(step) => KioskOutcome::MenuStep(step),
                    MenuOutcome::Committed(id) => KioskOutcome::LineAdded(id),
                })
            }
            KioskEvent::Drink(event) => {
                if matches!(event, DrinkEvent::Open { .. }) {
                    self.menu.reset();
                }

                self.drink.apply(event, &mut self.cart).map(|outcome| match outcome {
                    DrinkOutcome::Step(step, quantity) => KioskOutcome::DrinkStep(step, quantity),
                    DrinkOutcome::Committed(id) => KioskOutcome::LineAdded(id),
                })
            }
            KioskEvent::RemoveLine(id) => Ok(KioskOutcome::LineRemoved(self.cart.remove(id))),
            KioskEvent::ClearCart => {
                self.cart.clear();

                Ok(KioskOutcome::CartCleared)
            }
            KioskEvent::CloseConfirmation => {
                Ok(KioskOutcome::ConfirmationClosed(self.close_confirmation()))
            }
        };

        result.unwrap_or_else(|err| {
            debug!(error = %err, "selection event rejected");

            KioskOutcome::Rejected(err)
        })
    }

    /// Submit the cart as an order.
    ///
    /// # Errors
    ///
    /// See [`SubmissionCoordinator::submit`].
    pub async fn submit(&mut self) -> Result<(), SubmissionError> {
        self.submission
            .submit(&mut self.cart, self.transport.as_ref())
            .await
    }

    /// Close the order outcome message.
    pub fn close_confirmation(&mut self) -> Option<PostOrderDestination> {
        let mode = self.session.dining_mode();

        self.submission.close_confirmation(mode)
    }

    /// Snapshot of what the presentation layer shows.
    pub fn view(&self) -> CartView {
        CartView {
            lines: self.cart.cart().lines().to_vec(),
            total: self.cart.formatted_total(),
            status: self.submission.message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use crate::{
        cart::{MockCartListener, NoopListener},
        orders::{MockOrderTransport, OrderResponse},
        persistence::MemoryStorage,
        selection::{DrinkSize, MenuVariant, Side},
    };

    use super::*;

    fn product(name: &str, cents: i64, kind: CategoryKind) -> Product {
        Product {
            name: name.to_string(),
            price: Decimal::new(cents, 2),
            image: String::new(),
            kind,
        }
    }

    fn session_with(transport: MockOrderTransport) -> KioskSession {
        KioskSession::restore(
            Arc::new(MemoryStorage::new()),
            EUR,
            Arc::new(NoopListener),
            Arc::new(transport),
        )
    }

    #[test]
    fn simple_product_goes_straight_to_cart() {
        let mut session = session_with(MockOrderTransport::new());

        let outcome = session.select_product(&product("Cheeseburger", 250, CategoryKind::Simple));

        assert!(matches!(outcome, KioskOutcome::LineAdded(_)));
        assert_eq!(session.view().total, "2,50 €");
        assert!(!session.menu().is_open());
    }

    #[test]
    fn menu_product_opens_menu_and_closes_drink() {
        let mut session = session_with(MockOrderTransport::new());

        session.select_product(&product("Coca-Cola", 190, CategoryKind::Drinks));
        let outcome = session.select_product(&product("Menu Big Mac", 800, CategoryKind::Menus));

        assert_eq!(outcome, KioskOutcome::MenuStep(MenuStep::Idle));
        assert!(session.menu().is_open());
        assert!(!session.drink().is_open());
        assert!(session.cart().cart().is_empty());
    }

    #[test]
    fn open_events_close_the_other_modal() {
        let mut session = session_with(MockOrderTransport::new());

        session.dispatch(KioskEvent::Drink(DrinkEvent::Open {
            name: "Coca-Cola".to_string(),
            price: Decimal::new(190, 2),
        }));
        session.dispatch(KioskEvent::Menu(MenuEvent::Open {
            name: "Menu Big Mac".to_string(),
            price: Decimal::new(800, 2),
        }));

        assert!(session.menu().is_open());
        assert!(!session.drink().is_open());

        session.dispatch(KioskEvent::Drink(DrinkEvent::Open {
            name: "Sprite".to_string(),
            price: Decimal::new(190, 2),
        }));

        assert!(session.drink().is_open());
        assert!(!session.menu().is_open());
    }

    #[test]
    fn full_menu_through_dispatch() -> TestResult {
        let mut session = session_with(MockOrderTransport::new());

        let events = [
            KioskEvent::SelectProduct(product("Menu Big Mac", 700, CategoryKind::Menus)),
            KioskEvent::Menu(MenuEvent::ChooseVariant(MenuVariant::MaxiBestOf)),
            KioskEvent::Menu(MenuEvent::ChooseSide(Side::Fries)),
            KioskEvent::Menu(MenuEvent::ChooseDrink("Cola".to_string())),
        ];

        for event in events {
            assert!(!matches!(session.dispatch(event), KioskOutcome::Rejected(_)));
        }

        let KioskOutcome::LineAdded(id) = session.dispatch(KioskEvent::Menu(MenuEvent::Commit))
        else {
            return Err("expected the menu to be added".into());
        };

        let line = session.cart().cart().get(id).ok_or("missing line")?;

        assert_eq!(line.unit_price(), Decimal::new(800, 2));
        assert_eq!(line.options(), ["Frites", "Cola"]);

        Ok(())
    }

    #[test]
    fn incomplete_menu_commit_is_rejected_quietly() {
        let mut session = session_with(MockOrderTransport::new());

        session.select_product(&product("Menu Big Mac", 700, CategoryKind::Menus));

        let outcome = session.dispatch(KioskEvent::Menu(MenuEvent::Commit));

        assert_eq!(
            outcome,
            KioskOutcome::Rejected(SelectionError::StepIncomplete("variant"))
        );
        assert!(session.cart().cart().is_empty());
    }

    #[test]
    fn drink_through_dispatch() {
        let mut session = session_with(MockOrderTransport::new());

        session.select_product(&product("Fanta", 190, CategoryKind::Drinks));
        session.dispatch(KioskEvent::Drink(DrinkEvent::ChooseSize(DrinkSize::Large)));
        session.dispatch(KioskEvent::Drink(DrinkEvent::Increment));

        let outcome = session.dispatch(KioskEvent::Drink(DrinkEvent::Commit));

        assert!(matches!(outcome, KioskOutcome::LineAdded(_)));
        assert_eq!(session.view().total, "4,80 €");
    }

    #[test]
    fn listener_sees_every_cart_change() -> TestResult {
        let mut listener = MockCartListener::new();

        listener.expect_cart_changed().times(2).return_const(());

        let mut session = KioskSession::restore(
            Arc::new(MemoryStorage::new()),
            EUR,
            Arc::new(listener),
            Arc::new(MockOrderTransport::new()),
        );

        let KioskOutcome::LineAdded(id) =
            session.select_product(&product("Sundae", 300, CategoryKind::Simple))
        else {
            return Err("expected a line".into());
        };

        assert_eq!(
            session.dispatch(KioskEvent::RemoveLine(id)),
            KioskOutcome::LineRemoved(true)
        );
        assert_eq!(
            session.dispatch(KioskEvent::RemoveLine(id)),
            KioskOutcome::LineRemoved(false)
        );

        Ok(())
    }

    #[tokio::test]
    async fn takeaway_order_navigates_to_thank_you() -> TestResult {
        let mut transport = MockOrderTransport::new();

        transport
            .expect_send()
            .once()
            .returning(|_| Ok(OrderResponse { success: true }));

        let mut session = session_with(transport);

        session.set_dining_mode(DiningMode::Takeaway)?;
        session.select_product(&product("Cheeseburger", 250, CategoryKind::Simple));
        session.submit().await?;

        assert!(session.view().lines.is_empty());
        assert!(session.view().status.is_some());

        assert_eq!(
            session.dispatch(KioskEvent::CloseConfirmation),
            KioskOutcome::ConfirmationClosed(Some(PostOrderDestination::ThankYou))
        );
        assert_eq!(session.view().status, None);

        Ok(())
    }
}
