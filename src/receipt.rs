//! Receipt
//!
//! Terminal rendering of a cart and its checkout summary.

use std::io;

use rusty_money::{Money, iso::Currency};
use smallvec::{SmallVec, smallvec};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    checkout::CheckoutSummary,
    items::CartLineItem,
    prices::Price,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// A cart paired with the totals derived from it.
#[derive(Debug, Clone, Copy)]
pub struct CartReceipt<'a> {
    cart: &'a Cart,
    summary: &'a CheckoutSummary,
}

impl<'a> CartReceipt<'a> {
    /// Create a receipt view over a cart and its summary.
    pub fn new(cart: &'a Cart, summary: &'a CheckoutSummary) -> Self {
        Self { cart, summary }
    }

    /// Write the line item table followed by the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if self.cart.is_empty() {
            writeln!(out, "\nYour cart is empty.\n")?;
            return Ok(());
        }

        let mut builder = Builder::default();
        let mut color_ops: SmallVec<[(usize, usize, Color); 16]> = smallvec![];

        push_header(&mut builder);

        for (idx, item) in self.cart.iter().enumerate() {
            let row = idx + 1; // header is row 0

            push_item_row(&mut builder, idx, item, self.cart.currency());

            color_ops.push((row, 2, color_dark_grey()));

            if !item.in_stock() {
                color_ops.push((row, 1, Color::FG_RED));
            } else if item.line_savings() > 0 {
                color_ops.push((row, 7, color_dark_green()));
            }
        }

        write_table(&mut out, builder, color_ops)?;
        write_summary(&mut out, self.summary)
    }
}

fn push_header(builder: &mut Builder) {
    builder.push_record([
        "", "Item", "Brand", "Qty", "Price", "MRP", "Total", "Savings",
    ]);
}

fn push_item_row(
    builder: &mut Builder,
    idx: usize,
    item: &CartLineItem,
    currency: &'static Currency,
) {
    let product = item.product();

    let name = if item.in_stock() {
        product.name.clone()
    } else {
        format!("{} (out of stock)", product.name)
    };

    let savings = item.line_savings();

    builder.push_record([
        format!("#{:<3}", idx + 1),
        name,
        product.brand.clone().unwrap_or_default(),
        item.quantity().to_string(),
        item.price().to_money(currency).to_string(),
        item.mrp().to_money(currency).to_string(),
        money(item.line_total(), currency).to_string(),
        if savings == 0 {
            String::new()
        } else {
            money(savings, currency).to_string()
        },
    ]);
}

fn money(minor: i64, currency: &'static Currency) -> Money<'static, Currency> {
    Price::from_minor(minor).to_money(currency)
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    color_ops: SmallVec<[(usize, usize, Color); 16]>,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..8), Alignment::right());

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    writeln!(out, "\n{table}")?;

    Ok(())
}

fn write_summary(
    out: &mut impl io::Write,
    summary: &CheckoutSummary,
) -> Result<(), ReceiptError> {
    let mut lines: SmallVec<[(String, String); 6]> = smallvec![
        ("Subtotal:".to_string(), summary.subtotal.to_string()),
        ("You save:".to_string(), summary.savings.to_string()),
    ];

    if let Some(promo) = &summary.promo {
        let value = if promo.valid {
            format!("-{}", summary.promo_discount)
        } else {
            "invalid code".to_string()
        };

        lines.push((format!("Promo {}:", promo.code), value));
    }

    let delivery = if summary.delivery_fee.to_minor_units() == 0 {
        "free".to_string()
    } else {
        summary.delivery_fee.to_string()
    };

    lines.push(("Delivery:".to_string(), delivery));
    lines.push(("Total:".to_string(), summary.final_total.to_string()));

    let label_width = lines
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or_default();

    let value_width = lines
        .iter()
        .map(|(_, value)| value.chars().count())
        .max()
        .unwrap_or_default();

    for (label, value) in &lines {
        writeln!(out, " {label:>label_width$}  {value:>value_width$}")?;
    }

    writeln!(out)?;

    Ok(())
}

fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}

fn color_dark_green() -> Color {
    Color::new("\x1b[32m", "\x1b[0m")
}
