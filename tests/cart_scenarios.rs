//! Cart behaviour as seen by a storefront: repeated adds, quantity edits, removal, totals and
//! checkout against the dental catalog.
//!
//! Amounts are in rupees; the cart works in paise.

use rusty_money::{Money, iso::INR};
use testresult::TestResult;

use enamel::{
    cart::Cart,
    checkout::{CheckoutError, CheckoutSummary, DeliveryPolicy},
    fixtures::Fixture,
    prices::Price,
    products::{CartLineItemInput, ProductId},
    promotions::PromoCodeTable,
};

fn rupees(amount: i64) -> Price {
    Price::from_minor(amount * 100)
}

fn inr(amount: i64) -> Money<'static, rusty_money::iso::Currency> {
    Money::from_minor(amount * 100, INR)
}

fn composite_kit() -> CartLineItemInput {
    CartLineItemInput::new(1, "Composite Restoration Kit", rupees(2_200))
        .with_mrp(rupees(3_000))
}

fn rotary_files() -> CartLineItemInput {
    CartLineItemInput::new(2, "Endodontic Rotary Files", rupees(12_500))
        .with_mrp(rupees(16_000))
}

#[test]
fn repeat_adds_build_one_line() -> TestResult {
    let mut cart = Cart::new(INR);

    cart.add_item(composite_kit());
    cart.add_item(rotary_files());

    let before = cart.get_item(&ProductId::Int(1)).ok_or("missing kit")?;
    let before = before.quantity();

    cart.add_item(composite_kit());
    cart.add_item(composite_kit());

    let kit = cart.get_item(&ProductId::Int(1)).ok_or("missing kit")?;

    let kit_lines = cart.iter().filter(|item| item.id() == kit.id());

    assert_eq!(kit.quantity(), before + 2);
    assert_eq!(kit_lines.count(), 1);

    Ok(())
}

#[test]
fn repeat_adds_stop_at_the_cap() -> TestResult {
    let mut cart = Cart::new(INR);
    let explorer = CartLineItemInput::new("explorer", "Dental Explorer", rupees(300))
        .with_max_quantity(2);

    for _ in 0..5 {
        cart.add_item(explorer.clone());
    }

    let line = cart
        .get_item(&ProductId::from("explorer"))
        .ok_or("missing explorer")?;

    assert_eq!(line.quantity(), 2);
    assert_eq!(cart.total_items(), 2);

    Ok(())
}

#[test]
fn quantity_never_drops_below_one() -> TestResult {
    let mut cart = Cart::new(INR);

    cart.add_item(composite_kit());

    assert!(!cart.update_quantity(&ProductId::Int(1), 0));
    assert!(!cart.update_quantity(&ProductId::Int(1), -1));
    let kit = cart.get_item(&ProductId::Int(1)).ok_or("missing kit")?;

    assert_eq!(kit.quantity(), 1);

    Ok(())
}

#[test]
fn removal_takes_the_whole_line() -> TestResult {
    let mut cart = Cart::new(INR);

    cart.add_item(composite_kit());
    cart.add_item(rotary_files());
    cart.update_quantity(&ProductId::Int(2), 4);

    let before = cart.total_items();
    let removed = cart.remove_item(&ProductId::Int(2));
    let removed = removed.ok_or("nothing removed")?;

    assert!(cart.get_item(&ProductId::Int(2)).is_none());
    assert_eq!(cart.total_items(), before - u64::from(removed.quantity()));
    assert!(cart.remove_item(&ProductId::Int(2)).is_none());

    Ok(())
}

#[test]
fn totals_match_line_sums() {
    let mut cart = Cart::new(INR);

    cart.add_item(composite_kit());
    cart.add_item(rotary_files());
    cart.add_item(CartLineItemInput::new(
        "gloves",
        "Nitrile Gloves",
        rupees(450),
    ));
    cart.update_quantity(&ProductId::from("gloves"), 3);

    let expected: i64 = cart
        .iter()
        .map(|item| *item.price() * i64::from(item.quantity()))
        .sum();

    assert_eq!(cart.total_price().to_minor_units(), expected);
    assert_eq!(
        cart.total_savings().to_minor_units(),
        cart.total_mrp().to_minor_units() - cart.total_price().to_minor_units()
    );
}

#[test]
fn clear_empties_everything() {
    let mut cart = Cart::new(INR);

    cart.add_item(composite_kit());
    cart.add_item(rotary_files());
    cart.clear();

    assert_eq!(cart.total_items(), 0);
    assert_eq!(cart.total_price(), inr(0));
    assert!(cart.is_empty());
}

#[test]
fn kit_files_kit_scenario() -> TestResult {
    let mut cart = Cart::new(INR);

    cart.add_item(composite_kit());
    cart.add_item(rotary_files());
    cart.add_item(composite_kit());

    assert_eq!(cart.total_items(), 3);
    assert_eq!(cart.total_price(), inr(16_900));
    assert_eq!(cart.total_mrp(), inr(22_000));
    assert_eq!(cart.total_savings(), inr(5_100));

    let summary = CheckoutSummary::quote(
        &cart,
        &PromoCodeTable::default(),
        Some("DENTAL10"),
        &DeliveryPolicy::default(),
    )?;

    assert_eq!(summary.promo_discount, inr(1_690));
    assert_eq!(summary.delivery_fee, inr(0));
    assert_eq!(summary.final_total, inr(15_210));

    Ok(())
}

#[test]
fn small_orders_pay_delivery() -> TestResult {
    let mut cart = Cart::new(INR);

    cart.add_item(composite_kit());

    let summary = CheckoutSummary::quote(
        &cart,
        &PromoCodeTable::default(),
        Some("first50"),
        &DeliveryPolicy::default(),
    )?;

    assert_eq!(summary.promo_discount, inr(50));
    assert_eq!(summary.delivery_fee, inr(200));
    assert_eq!(summary.final_total, inr(2_350));

    Ok(())
}

#[test]
fn promo_lookup() {
    let table = PromoCodeTable::default();

    let valid = table.apply("dental10", &inr(10_000));
    let bogus = table.apply("bogus", &inr(10_000));

    assert!(valid.valid);
    assert_eq!(valid.discount, inr(1_000));
    assert!(!bogus.valid);
    assert_eq!(bogus.discount, inr(0));
}

#[test]
fn catalog_cart_with_out_of_stock_line_cannot_be_ordered() -> TestResult {
    let fixture = Fixture::from_set("dental")?;
    let mut cart = Cart::new(fixture.currency()?);

    cart.add_item(fixture.product(&ProductId::Int(1))?.clone());
    cart.add_item(fixture.product(&ProductId::Int(3))?.clone());

    assert_eq!(cart.len(), 2);
    assert_eq!(cart.out_of_stock_items().count(), 1);

    let result = enamel::checkout::ensure_orderable(&cart);

    assert!(matches!(
        result,
        Err(CheckoutError::OutOfStock(ids)) if ids == vec![ProductId::Int(3)]
    ));

    Ok(())
}
