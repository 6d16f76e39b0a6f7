//! Per-customer aggregation over line items.

use rust_decimal::Decimal;

use crate::error::ProjectionError;
use crate::models::records::CustomerRecord;
use crate::models::source::LineItem;

/// Running totals for one customer.
///
/// Quantity, tax and price-with-tax are summed. The unit price is
/// overwritten by every item, so only the last item's rate survives.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerAccumulator {
    name: String,
    qty: Decimal,
    unit_price: Decimal,
    tax: Decimal,
    price_with_tax: Decimal,
}

impl CustomerAccumulator {
    /// Start with zeroed totals.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qty: Decimal::ZERO,
            unit_price: Decimal::ZERO,
            tax: Decimal::ZERO,
            price_with_tax: Decimal::ZERO,
        }
    }

    /// Fold one line item into the totals.
    ///
    /// Fails when a running total leaves the decimal range.
    pub fn add(mut self, item: &LineItem) -> Result<Self, ProjectionError> {
        self.qty = checked_sum(self.qty, item.qty(), "quantity")?;
        self.unit_price = item.unit_price();
        self.tax = checked_sum(self.tax, item.tax(), "tax")?;
        self.price_with_tax = checked_sum(self.price_with_tax, item.price_with_tax(), "price with tax")?;
        Ok(self)
    }

    /// Emit the customer record.
    pub fn finish(self) -> CustomerRecord {
        CustomerRecord {
            name: self.name,
            qty: self.qty,
            unit_price: self.unit_price,
            tax: self.tax,
            price_with_tax: self.price_with_tax,
        }
    }
}

fn checked_sum(total: Decimal, value: Decimal, field: &'static str) -> Result<Decimal, ProjectionError> {
    total
        .checked_add(value)
        .ok_or(ProjectionError::Overflow(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn item(qty: i64, rate: i64, gst: &str, amount: &str) -> LineItem {
        LineItem {
            description: None,
            quantity: Some(Decimal::from(qty)),
            rate: Some(Decimal::from(rate)),
            gst: Some(Decimal::from_str(gst).unwrap()),
            amount: Some(Decimal::from_str(amount).unwrap()),
        }
    }

    #[test]
    fn test_no_items_is_all_zero() {
        let record = CustomerAccumulator::new("Acme").finish();

        assert_eq!(record.name, "Acme");
        assert_eq!(record.qty, Decimal::ZERO);
        assert_eq!(record.unit_price, Decimal::ZERO);
        assert_eq!(record.tax, Decimal::ZERO);
        assert_eq!(record.price_with_tax, Decimal::ZERO);
    }

    // Unit price is last-write-wins while the other totals accumulate.
    // Confirm the intended customers-table semantics before changing this.
    #[test]
    fn test_unit_price_is_last_rate_not_sum() {
        let record = CustomerAccumulator::new("Acme")
            .add(&item(2, 10, "1", "21"))
            .and_then(|acc| acc.add(&item(1, 15, "0.75", "15.75")))
            .unwrap()
            .finish();

        assert_eq!(record.unit_price, Decimal::from(15));
        assert_eq!(record.qty, Decimal::from(3));
        assert_eq!(record.tax, Decimal::from_str("1.75").unwrap());
        assert_eq!(record.price_with_tax, Decimal::from_str("36.75").unwrap());
    }

    #[test]
    fn test_missing_rate_resets_unit_price() {
        let record = CustomerAccumulator::new("Acme")
            .add(&item(1, 15, "0", "15"))
            .and_then(|acc| acc.add(&LineItem::default()))
            .unwrap()
            .finish();

        assert_eq!(record.unit_price, Decimal::ZERO);
        assert_eq!(record.qty, Decimal::from(1));
    }

    #[test]
    fn test_sums_are_exact() {
        let record = CustomerAccumulator::new("Acme")
            .add(&item(1, 0, "0.1", "0.1"))
            .and_then(|acc| acc.add(&item(1, 0, "0.2", "0.2")))
            .unwrap()
            .finish();

        assert_eq!(record.price_with_tax, Decimal::from_str("0.3").unwrap());
    }

    #[test]
    fn test_overflowing_total_fails() {
        let huge = LineItem {
            quantity: Some(Decimal::MAX),
            ..LineItem::default()
        };

        let result = CustomerAccumulator::new("Acme")
            .add(&huge)
            .and_then(|acc| acc.add(&huge));
        assert_eq!(result, Err(ProjectionError::Overflow("quantity")));

        let taxed = LineItem {
            gst: Some(Decimal::MAX),
            ..LineItem::default()
        };
        let result = CustomerAccumulator::new("Acme")
            .add(&taxed)
            .and_then(|acc| acc.add(&taxed));
        assert_eq!(result, Err(ProjectionError::Overflow("tax")));
    }
}
