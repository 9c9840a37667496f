//! Menu Flow
//!
//! Walks a customer through composing a menu: variant, then side, then
//! drink (and optionally its size), then commit.

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::{
    cart::{CartEngine, LineId},
    pricing::MAXI_SURCHARGE,
    selection::{CommittedLine, DrinkSize, SelectionError, options_from},
};

/// Menu tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuVariant {
    /// Regular menu
    BestOf,

    /// Larger menu, with a surcharge
    MaxiBestOf,
}

impl MenuVariant {
    /// Label prefixed to the menu name on the cart line.
    pub fn label(self) -> &'static str {
        match self {
            Self::BestOf => "Menu Best Of",
            Self::MaxiBestOf => "Menu Maxi Best Of",
        }
    }

    /// Price added to the menu's base price.
    pub fn surcharge(self) -> Decimal {
        match self {
            Self::BestOf => Decimal::ZERO,
            Self::MaxiBestOf => MAXI_SURCHARGE,
        }
    }
}

/// Menu side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Fries
    Fries,

    /// Potato wedges
    Potatoes,
}

impl Side {
    /// Label stored as a line option.
    pub fn label(self) -> &'static str {
        match self {
            Self::Fries => "Frites",
            Self::Potatoes => "Potatoes",
        }
    }
}

/// Where a menu flow stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuStep {
    /// Nothing chosen yet
    Idle,

    /// Variant chosen
    VariantChosen,

    /// Variant and side chosen
    SideChosen,

    /// Variant, side and drink chosen; ready to commit
    DrinkChosen,

    /// Added to the cart; the flow resets to `Idle` right after
    Committed,
}

impl MenuStep {
    fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::VariantChosen => "variant-chosen",
            Self::SideChosen => "side-chosen",
            Self::DrinkChosen => "drink-chosen",
            Self::Committed => "committed",
        }
    }
}

/// The in-progress menu composition.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuDraft {
    /// Menu name as listed in the catalog
    pub item_name: String,

    /// Catalog price of the menu
    pub base_price: Decimal,

    /// Chosen variant
    pub variant: Option<MenuVariant>,

    /// Chosen side
    pub side: Option<Side>,

    /// Chosen drink
    pub drink: Option<String>,

    /// Chosen drink size, if the customer picked one
    pub drink_size: Option<DrinkSize>,
}

impl MenuDraft {
    fn new(item_name: String, base_price: Decimal) -> Self {
        Self {
            item_name,
            base_price,
            variant: None,
            side: None,
            drink: None,
            drink_size: None,
        }
    }
}

/// Currently selected menu controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuSelected<'a> {
    /// Selected variant
    pub variant: Option<MenuVariant>,

    /// Selected side
    pub side: Option<Side>,

    /// Selected drink
    pub drink: Option<&'a str>,

    /// Selected drink size
    pub drink_size: Option<DrinkSize>,
}

/// Events the presentation layer feeds into a [`MenuFlow`].
#[derive(Debug, Clone, PartialEq)]
pub enum MenuEvent {
    /// A menu was picked from the catalog.
    Open {
        /// Menu name
        name: String,

        /// Menu price
        price: Decimal,
    },

    /// A variant button was pressed.
    ChooseVariant(MenuVariant),

    /// A side button was pressed.
    ChooseSide(Side),

    /// A drink was picked.
    ChooseDrink(String),

    /// A drink size was picked.
    ChooseDrinkSize(DrinkSize),

    /// The back button was pressed.
    Back,

    /// The "add menu" button was pressed.
    Commit,

    /// The modal was closed.
    Cancel,
}

/// What a [`MenuEvent`] led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// The flow moved to a new step.
    Step(MenuStep),

    /// The menu was added to the cart as this line.
    Committed(LineId),
}

/// Menu Flow
#[derive(Debug, Clone, PartialEq)]
pub struct MenuFlow {
    draft: Option<MenuDraft>,
    step: MenuStep,
}

impl Default for MenuFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuFlow {
    /// A closed flow.
    #[must_use]
    pub fn new() -> Self {
        Self {
            draft: None,
            step: MenuStep::Idle,
        }
    }

    /// Current step.
    pub fn step(&self) -> MenuStep {
        self.step
    }

    /// The open draft, if any.
    pub fn draft(&self) -> Option<&MenuDraft> {
        self.draft.as_ref()
    }

    /// The choices to highlight; all `None` when no menu is open.
    pub fn selected(&self) -> MenuSelected<'_> {
        self.draft.as_ref().map_or_else(MenuSelected::default, |draft| MenuSelected {
            variant: draft.variant,
            side: draft.side,
            drink: draft.drink.as_deref(),
            drink_size: draft.drink_size,
        })
    }

    /// Whether a menu is being composed.
    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    /// Start composing `name`, discarding any draft already open.
    pub fn open(&mut self, name: impl Into<String>, base_price: Decimal) {
        if let Some(previous) = &self.draft {
            debug!(previous = %previous.item_name, "discarding open menu draft");
        }

        self.draft = Some(MenuDraft::new(name.into(), base_price));
        self.step = MenuStep::Idle;
    }

    /// Pick (or re-pick) the variant.
    ///
    /// # Errors
    ///
    /// Fails if no menu is open, or once the flow has moved past the variant step.
    pub fn choose_variant(&mut self, variant: MenuVariant) -> Result<MenuStep, SelectionError> {
        let step = self.step;
        let draft = self.draft_mut()?;

        match step {
            MenuStep::Idle | MenuStep::VariantChosen => {
                draft.variant = Some(variant);
                self.step = MenuStep::VariantChosen;

                Ok(self.step)
            }
            _ => Err(invalid(step, "choose a variant")),
        }
    }

    /// Pick (or re-pick) the side.
    ///
    /// # Errors
    ///
    /// Fails if no menu is open, no variant is chosen yet, or the flow has
    /// moved past the side step.
    pub fn choose_side(&mut self, side: Side) -> Result<MenuStep, SelectionError> {
        let step = self.step;
        let draft = self.draft_mut()?;

        match step {
            MenuStep::Idle => Err(SelectionError::StepIncomplete("variant")),
            MenuStep::VariantChosen | MenuStep::SideChosen => {
                draft.side = Some(side);
                self.step = MenuStep::SideChosen;

                Ok(self.step)
            }
            _ => Err(invalid(step, "choose a side")),
        }
    }

    /// Pick (or re-pick) the drink.
    ///
    /// # Errors
    ///
    /// Fails if no menu is open or the variant and side aren't chosen yet.
    pub fn choose_drink(&mut self, drink: impl Into<String>) -> Result<MenuStep, SelectionError> {
        let step = self.step;
        let draft = self.draft_mut()?;

        match step {
            MenuStep::Idle => Err(SelectionError::StepIncomplete("variant")),
            MenuStep::VariantChosen => Err(SelectionError::StepIncomplete("side")),
            MenuStep::SideChosen | MenuStep::DrinkChosen => {
                draft.drink = Some(drink.into());
                self.step = MenuStep::DrinkChosen;

                Ok(self.step)
            }
            MenuStep::Committed => Err(invalid(step, "choose a drink")),
        }
    }

    /// Pick a size for the menu drink. Optional; it never changes the price.
    ///
    /// # Errors
    ///
    /// Fails if no menu is open or no drink is chosen yet.
    pub fn choose_drink_size(&mut self, size: DrinkSize) -> Result<MenuStep, SelectionError> {
        let step = self.step;
        let draft = self.draft_mut()?;

        if step != MenuStep::DrinkChosen {
            return Err(SelectionError::StepIncomplete("drink"));
        }

        draft.drink_size = Some(size);

        Ok(step)
    }

    /// Undo the most recent choice.
    pub fn back(&mut self) -> MenuStep {
        let Some(draft) = self.draft.as_mut() else {
            return self.step;
        };

        self.step = match self.step {
            MenuStep::DrinkChosen => {
                draft.drink = None;
                draft.drink_size = None;

                MenuStep::SideChosen
            }
            MenuStep::SideChosen => {
                draft.side = None;

                MenuStep::VariantChosen
            }
            MenuStep::VariantChosen => {
                draft.variant = None;

                MenuStep::Idle
            }
            step @ (MenuStep::Idle | MenuStep::Committed) => step,
        };

        self.step
    }

    /// Build the cart line this draft would produce, without touching anything.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::StepIncomplete`] naming the first missing choice.
    pub fn finalize(&self) -> Result<CommittedLine, SelectionError> {
        let draft = self
            .draft
            .as_ref()
            .ok_or(SelectionError::NoActiveDraft("menu"))?;

        let variant = draft
            .variant
            .ok_or(SelectionError::StepIncomplete("variant"))?;
        let side = draft.side.ok_or(SelectionError::StepIncomplete("side"))?;
        let drink = draft
            .drink
            .as_deref()
            .ok_or(SelectionError::StepIncomplete("drink"))?;

        let name = format!("{} {}", variant.label(), strip_menu_word(&draft.item_name));
        let unit_price = draft.base_price + variant.surcharge();

        let mut options = options_from([side.label(), drink]);

        if let Some(size) = draft.drink_size {
            options.push(size.label().to_string());
        }

        Ok(CommittedLine {
            name,
            unit_price,
            options,
            quantity: 1,
        })
    }

    /// Add the composed menu to the cart and close the flow.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::StepIncomplete`] if a choice is missing; the
    /// cart is left untouched.
    #[tracing::instrument(name = "menu.commit", skip_all)]
    pub fn commit(&mut self, cart: &mut CartEngine) -> Result<LineId, SelectionError> {
        let line = self.finalize()?;

        let id = cart
            .add(&line.name, line.unit_price, line.options, line.quantity)
            .ok_or(SelectionError::NothingToAdd)?;

        self.step = MenuStep::Committed;

        info!(line_id = %id, name = %line.name, "menu added to cart");

        self.reset();

        Ok(id)
    }

    /// Close the flow and forget every choice.
    pub fn reset(&mut self) {
        self.draft = None;
        self.step = MenuStep::Idle;
    }

    /// Dispatch a presentation event to the matching transition.
    ///
    /// # Errors
    ///
    /// Propagates the error of the rejected transition; the flow and cart are
    /// left as they were.
    pub fn apply(
        &mut self,
        event: MenuEvent,
        cart: &mut CartEngine,
    ) -> Result<MenuOutcome, SelectionError> {
        let step = match event {
            MenuEvent::Open { name, price } => {
                self.open(name, price);

                self.step
            }
            MenuEvent::ChooseVariant(variant) => self.choose_variant(variant)?,
            MenuEvent::ChooseSide(side) => self.choose_side(side)?,
            MenuEvent::ChooseDrink(drink) => self.choose_drink(drink)?,
            MenuEvent::ChooseDrinkSize(size) => self.choose_drink_size(size)?,
            MenuEvent::Back => self.back(),
            MenuEvent::Commit => return self.commit(cart).map(MenuOutcome::Committed),
            MenuEvent::Cancel => {
                self.reset();

                self.step
            }
        };

        Ok(MenuOutcome::Step(step))
    }

    fn draft_mut(&mut self) -> Result<&mut MenuDraft, SelectionError> {
        self.draft
            .as_mut()
            .ok_or(SelectionError::NoActiveDraft("menu"))
    }
}

fn invalid(step: MenuStep, event: &'static str) -> SelectionError {
    SelectionError::InvalidTransition {
        step: step.name(),
        event,
    }
}

/// Drop a leading "menu" word, any case, from a catalog menu name.
fn strip_menu_word(name: &str) -> &str {
    if let Some((prefix, rest)) = name.split_at_checked(4)
        && prefix.eq_ignore_ascii_case("menu")
        && rest.starts_with(char::is_whitespace)
    {
        return rest.trim_start();
    }

    name
}
