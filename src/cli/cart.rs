use std::io::Write;

use anyhow::Result;
use clap::Args;
use enamel::{
    checkout::{CheckoutSummary, DeliveryPolicy},
    fixtures::Fixture,
    items::CartLineItem,
    products::ProductId,
    receipt::CartReceipt,
    storage::FileStorage,
    store::CartStore,
};

#[derive(Debug, Args)]
pub(crate) struct ProductArgs {
    /// Product id (numeric ids are matched as numbers)
    id: String,
}

#[derive(Debug, Args)]
pub(crate) struct SetArgs {
    /// Product id (numeric ids are matched as numbers)
    id: String,

    /// New quantity; values below 1 are ignored, values above the product cap are clamped
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
}

pub(crate) fn add(
    store: &mut CartStore<FileStorage>,
    fixture: &Fixture,
    args: &ProductArgs,
    out: &mut impl Write,
) -> Result<()> {
    let id = ProductId::parse(&args.id);
    let product = fixture.product(&id)?.clone();
    let name = product.name.clone();
    let in_stock = product.in_stock;

    let quantity = store.add_item(product)?;

    writeln!(out, "{name}: {quantity} in cart")?;

    if !in_stock {
        writeln!(out, "{name} is currently out of stock")?;
    }

    Ok(())
}

pub(crate) fn remove(
    store: &mut CartStore<FileStorage>,
    args: &ProductArgs,
    out: &mut impl Write,
) -> Result<()> {
    let id = ProductId::parse(&args.id);

    match store.remove_item(&id)? {
        Some(item) => writeln!(out, "removed {}", item.product().name)?,
        None => writeln!(out, "{id} is not in the cart")?,
    }

    Ok(())
}

pub(crate) fn set(
    store: &mut CartStore<FileStorage>,
    args: &SetArgs,
    out: &mut impl Write,
) -> Result<()> {
    let id = ProductId::parse(&args.id);

    if store.update_quantity(&id, args.quantity)? {
        let quantity = store
            .cart()
            .get_item(&id)
            .map_or(0, CartLineItem::quantity);

        writeln!(out, "{id}: quantity {quantity}")?;
    } else {
        writeln!(out, "{id}: unchanged")?;
    }

    Ok(())
}

pub(crate) fn clear(store: &mut CartStore<FileStorage>, out: &mut impl Write) -> Result<()> {
    store.clear_cart()?;

    writeln!(out, "cart cleared")?;

    Ok(())
}

pub(crate) fn show(store: &CartStore<FileStorage>, out: &mut impl Write) -> Result<()> {
    let summary = CheckoutSummary::new(store.cart(), None, &DeliveryPolicy::default())?;

    CartReceipt::new(store.cart(), &summary).write_to(out)?;

    Ok(())
}

pub(crate) fn products(fixture: &Fixture, out: &mut impl Write) -> Result<()> {
    let currency = fixture.currency()?;

    for product in fixture.products() {
        let id = product.id.to_string();
        let stock = if product.in_stock { "" } else { " (out of stock)" };

        writeln!(
            out,
            "{id:>16}  {}{stock}  {}",
            product.name,
            product.price.to_money(currency)
        )?;
    }

    Ok(())
}
