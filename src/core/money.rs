//! Amount arithmetic: half-up rounding, line totals and case sums.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::types::*;

/// An amount calculation left the range of `Decimal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("amount exceeds the representable range")]
pub struct AmountOverflow;

/// Largest difference accepted when reconciling declared sums.
pub const SUM_TOLERANCE: Decimal = dec!(0.01);

/// Round to two decimal places, midpoint away from zero (commercial rounding).
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to `dp` decimal places, midpoint away from zero.
pub fn round_half_up(amount: Decimal, dp: u32) -> Decimal {
    amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Number of significant digits, ignoring trailing fractional zeros.
pub fn total_digits(value: Decimal) -> u32 {
    value.normalize().mantissa().unsigned_abs().to_string().len() as u32
}

/// Number of fractional digits, ignoring trailing zeros.
pub fn fraction_digits(value: Decimal) -> u32 {
    value.normalize().scale()
}

/// `round2(price * quantity)`, or `None` on overflow.
pub fn line_amount(price: Decimal, quantity: u32) -> Option<Decimal> {
    price.checked_mul(Decimal::from(quantity)).map(round2)
}

/// Unit price of a fee line: explicit, or points times point value.
pub fn fee_unit_price(line: &FeeLine) -> Result<Option<Decimal>, AmountOverflow> {
    if let Some(price) = line.unit_price {
        return Ok(Some(price));
    }
    match (line.points, line.point_value) {
        (Some(points), Some(value)) => {
            let price = Decimal::from(points).checked_mul(value).ok_or(AmountOverflow)?;
            Ok(Some(round2(price)))
        }
        _ => Ok(None),
    }
}

/// Totals a fee line may legally declare.
///
/// Both the single rounding of `price * factor * quantity` and the rounding of
/// the factored unit price before multiplying by the quantity are accepted.
/// Returns an empty list when the line has no price source.
pub fn expected_fee_totals(line: &FeeLine) -> Result<Vec<Decimal>, AmountOverflow> {
    let Some(price) = fee_unit_price(line)? else {
        return Ok(Vec::new());
    };
    let factor = line.factor.unwrap_or(Decimal::ONE);
    let quantity = Decimal::from(line.position.quantity);
    let factored = price.checked_mul(factor).ok_or(AmountOverflow)?;
    let direct = round2(factored.checked_mul(quantity).ok_or(AmountOverflow)?);
    let per_unit = round2(round2(factored).checked_mul(quantity).ok_or(AmountOverflow)?);
    if direct == per_unit {
        Ok(vec![direct])
    } else {
        Ok(vec![direct, per_unit])
    }
}

/// Canonical total for a fee line, if it can be derived.
pub fn fee_total(line: &FeeLine) -> Option<Decimal> {
    expected_fee_totals(line).ok()?.into_iter().next()
}

/// Total a travel line should declare, if it carries a unit price.
pub fn expected_travel_total(line: &TravelLine) -> Result<Option<Decimal>, AmountOverflow> {
    let Some(price) = line.unit_price else {
        return Ok(None);
    };
    let gross = price
        .checked_mul(Decimal::from(line.position.quantity))
        .ok_or(AmountOverflow)?;
    let total = match line.share_divisor {
        Some(divisor) if divisor > 0 => gross.checked_div(Decimal::from(divisor)).ok_or(AmountOverflow)?,
        _ => gross,
    };
    Ok(Some(round2(total)))
}

/// Derive a sum block from line items, keeping the given prepayment and reduction.
pub fn compute_sums(
    items: &[LineItem],
    prepayment: Option<Decimal>,
    reduction: Option<Decimal>,
) -> Result<SumBlock, AmountOverflow> {
    let mut fees = Decimal::ZERO;
    let mut expenses: Option<Decimal> = None;
    let mut travel: Option<Decimal> = None;

    for item in items.iter().filter(|i| i.is_billable()) {
        let amount = item.billed_amount().ok_or(AmountOverflow)?;
        let bucket = match item {
            LineItem::Fee(_) => &mut fees,
            LineItem::Expense(_) => expenses.get_or_insert(Decimal::ZERO),
            LineItem::Travel(_) => travel.get_or_insert(Decimal::ZERO),
            LineItem::Text(_) => continue,
        };
        *bucket = bucket.checked_add(amount).ok_or(AmountOverflow)?;
    }

    let fees = round2(fees);
    let expenses = expenses.map(round2);
    let travel = travel.map(round2);
    let total = fees
        .checked_add(expenses.unwrap_or_default())
        .and_then(|t| t.checked_add(travel.unwrap_or_default()))
        .ok_or(AmountOverflow)?;
    let payable = payable_amount(total, prepayment, reduction)?;

    Ok(SumBlock {
        fees,
        expenses,
        travel,
        total,
        prepayment,
        reduction,
        payable,
    })
}

/// `total - prepayment - reduction`.
pub fn payable_amount(
    total: Decimal,
    prepayment: Option<Decimal>,
    reduction: Option<Decimal>,
) -> Result<Decimal, AmountOverflow> {
    total
        .checked_sub(prepayment.unwrap_or_default())
        .and_then(|p| p.checked_sub(reduction.unwrap_or_default()))
        .ok_or(AmountOverflow)
}

/// Recompute the sum block of a case from its items in place.
///
/// The sum block is left untouched on overflow.
pub fn recalculate_sums(core: &mut CaseCore) -> Result<(), AmountOverflow> {
    core.sums = compute_sums(&core.items, core.sums.prepayment, core.sums.reduction)?;
    Ok(())
}

/// True if two amounts agree within [`SUM_TOLERANCE`].
pub fn within_tolerance(a: Decimal, b: Decimal) -> bool {
    a.checked_sub(b).is_some_and(|d| d.abs() <= SUM_TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fee(quantity: u32, price: Option<Decimal>, factor: Option<Decimal>, total: Decimal) -> FeeLine {
        FeeLine {
            position: PositionCore {
                position_number: Some(1),
                provider_id: None,
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                time: None,
                quantity,
                text: "Beratung".into(),
                extra_text: None,
                id: None,
                idref: None,
            },
            code: FeeCode::new(FeeSchedule::Goae, "1"),
            factor,
            reduction_rate: None,
            point_value: None,
            points: None,
            unit_price: price,
            total,
            vat_rate: None,
            justification: None,
            billing: None,
        }
    }

    #[test]
    fn round2_is_half_up() {
        assert_eq!(round2(dec!(0.125)), dec!(0.13));
        assert_eq!(round2(dec!(0.135)), dec!(0.14));
        assert_eq!(round2(dec!(-0.125)), dec!(-0.13));
        assert_eq!(round2(dec!(10.724)), dec!(10.72));
    }

    #[test]
    fn digit_facets() {
        assert_eq!(total_digits(dec!(123.4500)), 5);
        assert_eq!(fraction_digits(dec!(123.4500)), 2);
        assert_eq!(total_digits(dec!(0.001)), 1);
        assert_eq!(fraction_digits(dec!(7)), 0);
    }

    #[test]
    fn fee_total_uses_factor_and_quantity() {
        let line = fee(3, Some(dec!(10.72)), Some(dec!(2.3)), dec!(73.97));
        let totals = expected_fee_totals(&line).unwrap();
        assert!(totals.contains(&dec!(73.97)));
    }

    #[test]
    fn fee_price_from_points() {
        let mut line = fee(1, None, Some(dec!(2.3)), dec!(0));
        line.points = Some(80);
        line.point_value = Some(dec!(0.0582873));
        // 80 * 0.0582873 = 4.662984 -> 4.66; * 2.3 = 10.718
        assert_eq!(fee_unit_price(&line), Ok(Some(dec!(4.66))));
        assert_eq!(fee_total(&line), Some(dec!(10.72)));
    }

    #[test]
    fn no_price_source_means_no_expectation() {
        let line = fee(1, None, Some(dec!(1.8)), dec!(12.34));
        assert_eq!(expected_fee_totals(&line), Ok(Vec::new()));
    }

    #[test]
    fn sums_skip_unbilled_lines() {
        let mut skipped = fee(1, Some(dec!(5)), None, dec!(5));
        skipped.billing = Some(BillingMode::NotBilled);
        let items = vec![
            LineItem::Fee(fee(3, Some(dec!(23)), None, dec!(69.00))),
            LineItem::Fee(skipped),
            LineItem::Text(TextLine::new(3, "Hinweis")),
        ];
        let sums = compute_sums(&items, Some(dec!(10)), None).unwrap();
        assert_eq!(sums.fees, dec!(69.00));
        assert_eq!(sums.total, dec!(69.00));
        assert_eq!(sums.payable, dec!(59.00));
        assert_eq!(sums.expenses, None);
    }

    #[test]
    fn oversized_amounts_overflow_without_panicking() {
        let line = fee(3, Some(Decimal::MAX), Some(dec!(2.3)), dec!(1));
        assert_eq!(expected_fee_totals(&line), Err(AmountOverflow));
        assert_eq!(fee_total(&line), None);

        let items = vec![
            LineItem::Fee(fee(1, None, None, Decimal::MAX)),
            LineItem::Fee(fee(1, None, None, Decimal::MAX)),
        ];
        assert_eq!(compute_sums(&items, None, None), Err(AmountOverflow));
        assert_eq!(payable_amount(Decimal::MIN, Some(Decimal::MAX), None), Err(AmountOverflow));
        assert!(!within_tolerance(Decimal::MAX, Decimal::MIN));
    }
}
