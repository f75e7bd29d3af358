//! Fill-up Field Reconciliation
//!
//! Unit price, total cost and volume are mutually derivable: any two determine
//! the third. The form lets the user type any of them, so this module decides
//! which value to fill in from the others.
//!
//! Two entry points:
//!
//! - [`reconcile`] runs while the user is editing and honours the field they
//!   touched last ([`LastEdited`]).
//! - [`finalize_for_save`] runs when the record is saved. It fills a missing
//!   volume from price and cost regardless of editing history, then enforces
//!   the minimum-data rule.
//!
//! Both are pure and idempotent: feeding a reconciled triple back in returns
//! the same triple.

use crate::error::{FuelLogError, FuelLogResult};
use serde::{Deserialize, Serialize};

/// The form field the user edited most recently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LastEdited {
    Price,
    Cost,
    #[value(alias = "volume")]
    Amount,
}

/// Unit price, total cost and volume as entered. Zero means absent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FuelFields {
    pub price: f64,
    pub total_cost: f64,
    pub amount: f64,
}

impl FuelFields {
    pub fn new(price: f64, total_cost: f64, amount: f64) -> Self {
        Self {
            price,
            total_cost,
            amount,
        }
    }

    fn present_count(&self) -> usize {
        [self.price, self.total_cost, self.amount]
            .iter()
            .filter(|v| **v > 0.0)
            .count()
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Derive the field implied by the last edit.
pub fn reconcile(fields: FuelFields, last_edited: Option<LastEdited>) -> FuelFields {
    let mut out = fields;
    if fields.present_count() < 2 {
        return out;
    }

    match last_edited {
        Some(LastEdited::Price) | Some(LastEdited::Cost) => {
            if fields.price > 0.0 && fields.total_cost > 0.0 {
                out.amount = round_to(fields.total_cost / fields.price, 2);
            }
        }
        Some(LastEdited::Amount) => {
            if fields.amount > 0.0 && fields.price > 0.0 {
                out.total_cost = round_to(fields.amount * fields.price, 2);
            } else if fields.amount > 0.0 && fields.total_cost > 0.0 {
                out.price = round_to(fields.total_cost / fields.amount, 3);
            }
        }
        None => {}
    }

    out
}

/// Fill a missing volume from price and cost. Applied on every save, even
/// when the user left volume blank on purpose.
pub fn derive_missing_amount(fields: FuelFields) -> FuelFields {
    let mut out = fields;
    if fields.price > 0.0 && fields.total_cost > 0.0 && fields.amount <= 0.0 {
        out.amount = round_to(fields.total_cost / fields.price, 2);
    }
    out
}

/// Every field must be a finite number, and at least one of total cost,
/// volume or odometer must be recorded.
pub fn check_minimum_data(fields: &FuelFields, odometer: u64) -> FuelLogResult<()> {
    for (name, value) in [
        ("price", fields.price),
        ("total cost", fields.total_cost),
        ("fuel amount", fields.amount),
    ] {
        if !value.is_finite() {
            return Err(FuelLogError::validation(format!(
                "{} must be a finite number, got {}",
                name, value
            )));
        }
    }
    if fields.total_cost <= 0.0 && fields.amount <= 0.0 && odometer == 0 {
        return Err(FuelLogError::validation(
            "enter at least the total cost, fuel amount, or an odometer reading",
        ));
    }
    Ok(())
}

/// Save-time pass: safety-net derivation followed by the minimum-data check.
pub fn finalize_for_save(fields: FuelFields, odometer: u64) -> FuelLogResult<FuelFields> {
    let fields = derive_missing_amount(fields);
    check_minimum_data(&fields, odometer)?;
    Ok(fields)
}
