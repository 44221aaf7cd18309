//! # Credit Balance Rules
//!
//! Pure arithmetic for how a sale is settled.
//!
//! ## Invariants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cash   : paid == total           outstanding == 0                      │
//! │  credit : paid + outstanding == total,   outstanding > 0                │
//! │  paid   : paid == total           outstanding == 0   (settled)          │
//! │                                                                         │
//! │  sale_type == credit  ⟺  outstanding > 0                                │
//! │  mark_paid always ends in `paid`, whatever the sale was before          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here returns a complete [`Settlement`], so the store
//! writes the three columns together and never derives one from another
//! in SQL.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{PaymentTerms, Sale, SaleType};

/// The settlement columns of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub sale_type: SaleType,
    pub paid: Money,
    pub outstanding: Money,
}

impl Settlement {
    /// A fully paid cash sale.
    pub fn cash(total: Money) -> Self {
        Settlement {
            sale_type: SaleType::Cash,
            paid: total,
            outstanding: Money::zero(),
        }
    }

    /// A credit sale with `paid` received so far. Becomes `paid` when
    /// nothing is left.
    fn credit(total: Money, paid: Money) -> Self {
        let outstanding = total - paid;
        let sale_type = if outstanding.is_positive() {
            SaleType::Credit
        } else {
            SaleType::Paid
        };

        Settlement {
            sale_type,
            paid,
            outstanding: outstanding.clamp_non_negative(),
        }
    }
}

impl From<&Sale> for Settlement {
    fn from(sale: &Sale) -> Self {
        Settlement {
            sale_type: sale.sale_type,
            paid: sale.paid(),
            outstanding: sale.outstanding(),
        }
    }
}

/// Settles a sale being created.
///
/// The split is derived from `total` and the initial payment; a
/// caller-supplied `outstanding` is only checked, never trusted.
///
/// ## Example
/// ```rust
/// use tendero_core::credit::settle_new_sale;
/// use tendero_core::{Money, PaymentTerms, SaleType};
///
/// let s = settle_new_sale(
///     PaymentTerms::Credit,
///     Money::from_cents(300),
///     Some(Money::from_cents(100)),
///     None,
/// )
/// .unwrap();
/// assert_eq!(s.sale_type, SaleType::Credit);
/// assert_eq!(s.outstanding.cents(), 200);
/// ```
pub fn settle_new_sale(
    terms: PaymentTerms,
    total: Money,
    paid: Option<Money>,
    outstanding: Option<Money>,
) -> CoreResult<Settlement> {
    match terms {
        PaymentTerms::Cash => Ok(Settlement::cash(total)),
        PaymentTerms::Credit => {
            let paid = paid.unwrap_or_default();

            if paid.is_negative() {
                return Err(CoreError::invalid_amount("initial payment cannot be negative"));
            }
            if paid > total {
                return Err(CoreError::invalid_amount(format!(
                    "initial payment {} exceeds sale total {}",
                    paid, total
                )));
            }

            let settlement = Settlement::credit(total, paid);

            if let Some(claimed) = outstanding {
                if claimed != settlement.outstanding {
                    return Err(CoreError::invalid_amount(format!(
                        "outstanding balance {} does not match total {} minus payment {}",
                        claimed, total, paid
                    )));
                }
            }

            Ok(settlement)
        }
    }
}

/// Applies a payment towards an open balance.
///
/// ## Rules
/// - `amount` must be positive
/// - `amount` cannot exceed the outstanding balance
/// - reaching zero turns the sale into `paid`
pub fn apply_payment(current: Settlement, amount: Money) -> CoreResult<Settlement> {
    if !amount.is_positive() {
        return Err(CoreError::invalid_amount("payment must be positive"));
    }
    if amount > current.outstanding {
        return Err(CoreError::invalid_amount(format!(
            "payment {} exceeds outstanding balance {}",
            amount, current.outstanding
        )));
    }

    let paid = current.paid + amount;
    let outstanding = current.outstanding - amount;

    if outstanding.is_positive() {
        Ok(Settlement {
            sale_type: current.sale_type,
            paid,
            outstanding,
        })
    } else {
        Ok(Settlement {
            sale_type: SaleType::Paid,
            paid,
            outstanding: Money::zero(),
        })
    }
}

/// Settles the whole balance regardless of what was paid before.
///
/// The result is always `paid`, cash sales included.
pub fn mark_paid(total: Money) -> Settlement {
    Settlement {
        sale_type: SaleType::Paid,
        paid: total,
        outstanding: Money::zero(),
    }
}

/// Re-derives the settlement after the sale total changed (a line was
/// removed).
///
/// Cash sales stay fully paid. Credit sales keep what was received, capped
/// at the new total, and owe the rest.
pub fn resettle(current: Settlement, new_total: Money) -> Settlement {
    match current.sale_type {
        SaleType::Cash => Settlement::cash(new_total),
        SaleType::Credit | SaleType::Paid => {
            let paid = if current.paid > new_total {
                new_total
            } else {
                current.paid
            };
            Settlement::credit(new_total, paid)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(cents: i64) -> Money {
        Money::from_cents(cents)
    }

    fn assert_balanced(s: &Settlement, total: Money) {
        assert_eq!(s.paid + s.outstanding, total);
        assert_eq!(
            s.sale_type == SaleType::Credit,
            s.outstanding.is_positive(),
            "credit iff open balance: {:?}",
            s
        );
    }

    #[test]
    fn test_cash_sale_is_fully_paid() {
        let s = settle_new_sale(PaymentTerms::Cash, m(300), Some(m(5)), Some(m(7))).unwrap();
        assert_eq!(s, Settlement::cash(m(300)));
        assert_balanced(&s, m(300));
    }

    #[test]
    fn test_credit_split_derived() {
        let s = settle_new_sale(PaymentTerms::Credit, m(300), Some(m(100)), Some(m(200))).unwrap();
        assert_eq!(s.sale_type, SaleType::Credit);
        assert_eq!(s.paid, m(100));
        assert_eq!(s.outstanding, m(200));

        let s = settle_new_sale(PaymentTerms::Credit, m(300), None, None).unwrap();
        assert_eq!(s.paid, Money::zero());
        assert_eq!(s.outstanding, m(300));
    }

    #[test]
    fn test_credit_split_mismatch_rejected() {
        let err = settle_new_sale(PaymentTerms::Credit, m(300), Some(m(100)), Some(m(150)))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount { .. }));

        let err = settle_new_sale(PaymentTerms::Credit, m(300), Some(m(301)), None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount { .. }));

        let err = settle_new_sale(PaymentTerms::Credit, m(300), Some(m(-1)), None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount { .. }));
    }

    #[test]
    fn test_credit_fully_paid_upfront_is_paid() {
        let s = settle_new_sale(PaymentTerms::Credit, m(300), Some(m(300)), None).unwrap();
        assert_eq!(s.sale_type, SaleType::Paid);
        assert_balanced(&s, m(300));
    }

    #[test]
    fn test_payment_closes_balance() {
        let open = settle_new_sale(PaymentTerms::Credit, m(300), Some(m(100)), None).unwrap();

        let partial = apply_payment(open, m(50)).unwrap();
        assert_eq!(partial.sale_type, SaleType::Credit);
        assert_balanced(&partial, m(300));

        let closed = apply_payment(partial, m(150)).unwrap();
        assert_eq!(closed.sale_type, SaleType::Paid);
        assert_eq!(closed.outstanding, Money::zero());
        assert_balanced(&closed, m(300));

        let err = apply_payment(closed, m(1)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount { .. }));
    }

    #[test]
    fn test_payment_must_be_positive() {
        let open = settle_new_sale(PaymentTerms::Credit, m(300), None, None).unwrap();
        assert!(apply_payment(open, Money::zero()).is_err());
        assert!(apply_payment(open, m(-10)).is_err());
        assert!(apply_payment(open, m(301)).is_err());
    }

    #[test]
    fn test_mark_paid() {
        let open = settle_new_sale(PaymentTerms::Credit, m(300), Some(m(10)), None).unwrap();
        assert_eq!(open.outstanding, m(290));

        let s = mark_paid(m(300));
        assert_eq!(s.sale_type, SaleType::Paid);
        assert_eq!(s.paid, m(300));
        assert_balanced(&s, m(300));
    }

    #[test]
    fn test_resettle_after_line_removed() {
        let cash = resettle(Settlement::cash(m(500)), m(200));
        assert_eq!(cash, Settlement::cash(m(200)));

        let open = settle_new_sale(PaymentTerms::Credit, m(500), Some(m(100)), None).unwrap();
        let s = resettle(open, m(300));
        assert_eq!(s.paid, m(100));
        assert_eq!(s.outstanding, m(200));
        assert_balanced(&s, m(300));

        // Received more than the new total: capped, nothing owed.
        let s = resettle(open, m(80));
        assert_eq!(s.paid, m(80));
        assert_eq!(s.sale_type, SaleType::Paid);
        assert_balanced(&s, m(80));
    }
}
