//! Kiosk CLI

use std::{
    io::{self, Write},
    process::ExitCode,
    sync::Arc,
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use kiosk::{
    cart::{Cart, CartListener, LineId},
    catalog::{Catalog, CatalogError, CategoryKind, Product},
    config::{CatalogSource, ConfigError, KioskConfig},
    observability::{self, ObservabilityError},
    orders::{DiningMode, HttpOrderTransport, PostOrderDestination, SubmissionError},
    persistence::{FileStorage, PersistenceError},
    render::{self, RenderError},
    selection::{DrinkEvent, DrinkSize, MenuEvent, MenuVariant, SelectionError, Side},
    session::{KioskEvent, KioskOutcome, KioskSession},
};
use reqwest::Client;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Parser)]
#[command(name = "kiosk", about = "Fast-food ordering kiosk", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: KioskConfig,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Load configuration from `.env`, the environment and CLI arguments.
    fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List categories and products
    Catalog,

    /// Inspect or change the cart
    Cart(CartCommand),

    /// Compose a menu and add it to the cart
    Menu(MenuArgs),

    /// Add a standalone drink to the cart
    Drink(DrinkArgs),

    /// Show or set the dine-in/takeaway choice
    Dining(DiningArgs),

    /// Submit the cart as an order
    Checkout,
}

#[derive(Debug, Args)]
struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart
    Show,

    /// Add a product that needs no selection
    Add {
        /// Product name, as listed in the catalog
        name: String,
    },

    /// Remove a line by id
    Remove {
        /// Line id, as shown by `cart show`
        id: LineId,
    },

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct MenuArgs {
    /// Menu name, as listed in the catalog
    name: String,

    /// Menu variant
    #[arg(long, value_enum, default_value_t = VariantArg::BestOf)]
    variant: VariantArg,

    /// Side
    #[arg(long, value_enum)]
    side: SideArg,

    /// Drink, as listed in the catalog
    #[arg(long)]
    drink: String,

    /// Drink size
    #[arg(long, value_enum)]
    size: Option<SizeArg>,
}

#[derive(Debug, Args)]
struct DrinkArgs {
    /// Drink name, as listed in the catalog
    name: String,

    /// Drink size
    #[arg(long, value_enum)]
    size: SizeArg,

    /// Number of drinks
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=30))]
    quantity: u32,
}

#[derive(Debug, Args)]
struct DiningArgs {
    /// Mode to store; shows the current mode when omitted
    #[arg(value_enum)]
    mode: Option<DiningArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    BestOf,
    Maxi,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SideArg {
    Fries,
    Potatoes,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SizeArg {
    Small,
    Large,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DiningArg {
    DineIn,
    Takeaway,
}

impl From<VariantArg> for MenuVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::BestOf => Self::BestOf,
            VariantArg::Maxi => Self::MaxiBestOf,
        }
    }
}

impl From<SideArg> for Side {
    fn from(arg: SideArg) -> Self {
        match arg {
            SideArg::Fries => Self::Fries,
            SideArg::Potatoes => Self::Potatoes,
        }
    }
}

impl From<SizeArg> for DrinkSize {
    fn from(arg: SizeArg) -> Self {
        match arg {
            SizeArg::Small => Self::Small,
            SizeArg::Large => Self::Large,
        }
    }
}

impl From<DiningArg> for DiningMode {
    fn from(arg: DiningArg) -> Self {
        match arg {
            DiningArg::DineIn => Self::DineIn,
            DiningArg::Takeaway => Self::Takeaway,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Observability(#[from] ObservabilityError),

    #[error("{}", .0.user_message())]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("no product named `{0}` in the catalog")]
    UnknownProduct(String),

    #[error("`{name}` is {expected}, use `kiosk {command}` instead")]
    WrongCommand {
        name: String,
        expected: &'static str,
        command: &'static str,
    },

    #[error("no line with id {0} in the cart")]
    UnknownLine(LineId),
}

/// Logs every cart change.
struct LogListener;

impl CartListener for LogListener {
    fn cart_changed(&self, cart: &Cart) {
        debug!(lines = cart.len(), total = %cart.formatted_total(), "cart changed");
    }
}

/// Everything a command needs.
struct Context {
    config: KioskConfig,
    currency: &'static Currency,
    http: Client,
    session: KioskSession,
}

impl Context {
    fn new(config: KioskConfig) -> Result<Self, CliError> {
        let currency = config.currency()?;
        let http = config.orders.http_client().map_err(ConfigError::from)?;

        let storage = Arc::new(FileStorage::new(&config.storage.storage_dir));
        let transport = Arc::new(HttpOrderTransport::new(
            http.clone(),
            config.orders.order_url.as_str(),
        ));

        let session = KioskSession::restore(storage, currency, Arc::new(LogListener), transport);

        Ok(Self {
            config,
            currency,
            http,
            session,
        })
    }

    async fn catalog(&self) -> Result<Catalog, CatalogError> {
        let result = match self.config.catalog.source() {
            CatalogSource::Dir(dir) => Catalog::load_dir(dir),
            CatalogSource::Url(url) => Catalog::fetch(&self.http, url).await,
        };

        result.inspect_err(|err| warn!(error = %err, "failed to load catalog"))
    }

    fn show_cart(&self) -> Result<(), CliError> {
        render::write_cart(io::stdout().lock(), &self.session.view(), self.currency)?;

        Ok(())
    }

    fn dispatch(&mut self, event: KioskEvent) -> Result<KioskOutcome, CliError> {
        match self.session.dispatch(event) {
            KioskOutcome::Rejected(err) => Err(err.into()),
            outcome => Ok(outcome),
        }
    }
}

#[tokio::main]
pub async fn main() -> ExitCode {
    let cli = Cli::load().unwrap_or_else(|e| e.exit());

    if let Err(error) = run(cli).await {
        report(&error);

        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "errors are reported to the terminal user, not the log"
)]
fn report(error: &CliError) {
    eprintln!("{error}");
}

async fn run(cli: Cli) -> Result<(), CliError> {
    observability::init_subscriber(&cli.config.logging)?;

    let mut context = Context::new(cli.config)?;

    match cli.command {
        Commands::Catalog => {
            let catalog = context.catalog().await?;

            render::write_catalog(io::stdout().lock(), &catalog, context.currency)?;
        }
        Commands::Cart(CartCommand { command }) => cart(&mut context, &command).await?,
        Commands::Menu(args) => menu(&mut context, args).await?,
        Commands::Drink(args) => drink(&mut context, &args).await?,
        Commands::Dining(DiningArgs { mode }) => {
            if let Some(mode) = mode {
                context.session.set_dining_mode(mode.into())?;
            }

            writeln!(io::stdout(), "{}", context.session.dining_mode().label())?;
        }
        Commands::Checkout => checkout(&mut context).await?,
    }

    Ok(())
}

async fn cart(context: &mut Context, command: &CartSubcommand) -> Result<(), CliError> {
    match command {
        CartSubcommand::Show => {}
        CartSubcommand::Add { name } => {
            let catalog = context.catalog().await?;
            let product = find(&catalog, name)?;

            if product.kind != CategoryKind::Simple {
                return Err(wrong_command(product));
            }

            context.dispatch(KioskEvent::SelectProduct(product.clone()))?;
        }
        CartSubcommand::Remove { id } => {
            let id = *id;

            if context.dispatch(KioskEvent::RemoveLine(id))? == KioskOutcome::LineRemoved(false) {
                return Err(CliError::UnknownLine(id));
            }
        }
        CartSubcommand::Clear => {
            context.dispatch(KioskEvent::ClearCart)?;
        }
    }

    context.show_cart()
}

async fn menu(context: &mut Context, args: MenuArgs) -> Result<(), CliError> {
    let catalog = context.catalog().await?;

    let product = find(&catalog, &args.name)?;

    if product.kind != CategoryKind::Menus {
        return Err(wrong_command(product));
    }

    let drink = find(&catalog, &args.drink)?;

    if drink.kind != CategoryKind::Drinks {
        return Err(CliError::UnknownProduct(args.drink));
    }

    let mut events = vec![
        KioskEvent::SelectProduct(product.clone()),
        KioskEvent::Menu(MenuEvent::ChooseVariant(args.variant.into())),
        KioskEvent::Menu(MenuEvent::ChooseSide(args.side.into())),
        KioskEvent::Menu(MenuEvent::ChooseDrink(drink.name.clone())),
    ];

    if let Some(size) = args.size {
        events.push(KioskEvent::Menu(MenuEvent::ChooseDrinkSize(size.into())));
    }

    events.push(KioskEvent::Menu(MenuEvent::Commit));

    for event in events {
        context.dispatch(event)?;
    }

    context.show_cart()
}

async fn drink(context: &mut Context, args: &DrinkArgs) -> Result<(), CliError> {
    let catalog = context.catalog().await?;

    let product = find(&catalog, &args.name)?;

    if product.kind != CategoryKind::Drinks {
        return Err(wrong_command(product));
    }

    context.dispatch(KioskEvent::SelectProduct(product.clone()))?;
    context.dispatch(KioskEvent::Drink(DrinkEvent::ChooseSize(args.size.into())))?;

    for _ in 1..args.quantity {
        context.dispatch(KioskEvent::Drink(DrinkEvent::Increment))?;
    }

    context.dispatch(KioskEvent::Drink(DrinkEvent::Commit))?;

    context.show_cart()
}

async fn checkout(context: &mut Context) -> Result<(), CliError> {
    let order_number = context.session.submission().order_number();

    info!(order_number, "submitting order");

    let result = context.session.submit().await;

    context.show_cart()?;

    result?;

    let mut out = io::stdout().lock();

    writeln!(out, "Order number: {order_number}")?;

    if let KioskOutcome::ConfirmationClosed(Some(destination)) =
        context.dispatch(KioskEvent::CloseConfirmation)?
    {
        let next = match destination {
            PostOrderDestination::ThankYou => "Thank you! Please wait for your number.",
            PostOrderDestination::TableTent => {
                "Take a table tent and we will bring the order to your table."
            }
        };

        writeln!(out, "{next}")?;
    }

    Ok(())
}

fn find<'a>(catalog: &'a Catalog, name: &str) -> Result<&'a Product, CliError> {
    catalog
        .find_product(name)
        .map(|(_, product)| product)
        .ok_or_else(|| CliError::UnknownProduct(name.to_string()))
}

fn wrong_command(product: &Product) -> CliError {
    let (expected, command) = match product.kind {
        CategoryKind::Menus => ("a menu", "menu"),
        CategoryKind::Drinks => ("a drink", "drink"),
        CategoryKind::Simple => ("sold on its own", "cart add"),
    };

    CliError::WrongCommand {
        name: product.name.clone(),
        expected,
        command,
    }
}
