use std::io;

use anyhow::{Context, Result, ensure};
use clap::{Parser, Subcommand};
use enamel::{
    config::{LoggingConfig, StoreConfig},
    store::CartStore,
};

mod cart;
mod checkout;

#[derive(Debug, Parser)]
#[command(name = "enamel", about = "Enamel cart CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(flatten)]
    store: StoreConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add one unit of a catalog product
    Add(cart::ProductArgs),

    /// Remove a product line from the cart
    Remove(cart::ProductArgs),

    /// Set the quantity of a product already in the cart
    Set(cart::SetArgs),

    /// Empty the cart
    Clear,

    /// Show the cart with its totals
    Show,

    /// Price the cart, optionally with a promo code, and optionally place the order
    Checkout(checkout::CheckoutArgs),

    /// Check a promo code against the current subtotal
    Promo(checkout::PromoArgs),

    /// List the catalog
    Products,
}

impl Cli {
    pub(crate) fn run(self) -> Result<()> {
        let fixture_set = &self.store.fixture_set;
        let fixture = self
            .store
            .fixture()
            .with_context(|| format!("failed to load fixture set {fixture_set:?}"))?;

        let options = self.store.store_options()?;

        ensure!(
            fixture.currency()? == options.currency,
            "catalog is priced in {}, cart uses {}",
            fixture.currency()?.iso_alpha_code,
            options.currency.iso_alpha_code
        );

        let mut store = CartStore::init(self.store.storage(), options).with_context(|| {
            format!(
                "failed to open cart in {}",
                self.store.storage_dir.display()
            )
        })?;

        let stdout = io::stdout();
        let mut out = stdout.lock();

        match self.command {
            Commands::Add(args) => cart::add(&mut store, &fixture, &args, &mut out)?,
            Commands::Remove(args) => cart::remove(&mut store, &args, &mut out)?,
            Commands::Set(args) => cart::set(&mut store, &args, &mut out)?,
            Commands::Clear => cart::clear(&mut store, &mut out)?,
            Commands::Show => cart::show(&store, &mut out)?,
            Commands::Checkout(args) => checkout::run(&mut store, &fixture, &args, &mut out)?,
            Commands::Promo(args) => checkout::promo(&store, &fixture, &args, &mut out)?,
            Commands::Products => cart::products(&fixture, &mut out)?,
        }

        store.teardown()?;

        Ok(())
    }
}
