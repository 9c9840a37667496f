//! Kiosk prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartEngine, CartLine, CartListener, LineId, LineOptions, NoopListener},
    catalog::{Catalog, CatalogError, Category, CategoryKind, Product, ProductKey},
    orders::{
        DiningMode, HttpOrderTransport, OrderPayload, OrderResponse, OrderTransport,
        PostOrderDestination, SubmissionCoordinator, SubmissionError, SubmissionState,
        TransportError,
    },
    persistence::{
        CartRepository, FileStorage, MemoryStorage, PersistenceError, SessionRepository, Storage,
    },
    pricing::format_money,
    selection::{
        CommittedLine, DrinkEvent, DrinkFlow, DrinkSize, DrinkStep, MenuEvent, MenuFlow,
        MenuStep, MenuVariant, QuantityCounter, SelectionError, Side,
    },
    session::{CartView, KioskEvent, KioskOutcome, KioskSession},
};
