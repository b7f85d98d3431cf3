use std::io::Write;

use anyhow::Result;
use clap::Args;
use enamel::{
    checkout::{CheckoutSummary, DeliveryPolicy},
    fixtures::Fixture,
    promotions::normalize_code,
    receipt::CartReceipt,
    storage::FileStorage,
    store::CartStore,
};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Promo code to apply
    #[arg(long)]
    promo: Option<String>,

    /// Place the order and empty the cart
    #[arg(long)]
    place: bool,
}

#[derive(Debug, Args)]
pub(crate) struct PromoArgs {
    /// Promo code to check
    code: String,
}

pub(crate) fn run(
    store: &mut CartStore<FileStorage>,
    fixture: &Fixture,
    args: &CheckoutArgs,
    out: &mut impl Write,
) -> Result<()> {
    let policy = DeliveryPolicy::default();
    let code = args.promo.as_deref();

    if args.place {
        let cart = store.cart().clone();
        let summary = store.place_order(fixture.promotions(), code, &policy)?;

        CartReceipt::new(&cart, &summary).write_to(&mut *out)?;
        writeln!(out, "Order placed.")?;
    } else {
        let summary = CheckoutSummary::quote(store.cart(), fixture.promotions(), code, &policy)?;

        CartReceipt::new(store.cart(), &summary).write_to(out)?;
    }

    Ok(())
}

pub(crate) fn promo(
    store: &CartStore<FileStorage>,
    fixture: &Fixture,
    args: &PromoArgs,
    out: &mut impl Write,
) -> Result<()> {
    let code = normalize_code(&args.code);
    let outcome = fixture
        .promotions()
        .apply(&code, &store.cart().total_price());

    if outcome.valid {
        writeln!(out, "{code}: -{}", outcome.discount)?;
    } else {
        writeln!(out, "{code}: invalid promo code")?;
    }

    Ok(())
}
