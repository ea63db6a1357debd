//! Turning tabular line-item rows into fee lines and splicing them into a batch.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::{PadnextError, ValidationError};
use super::money::{recalculate_sums, round2, round_half_up};
use super::types::*;

/// One row of an application table describing a billed service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRow {
    /// Fee schedule code, e.g. "GOAE".
    pub go: Option<String>,
    /// Billing code within the schedule.
    pub code: Option<String>,
    pub quantity: Option<u32>,
    pub text: Option<String>,
    pub total: Option<Decimal>,
    pub factor: Option<Decimal>,
    pub unit_price: Option<Decimal>,
}

/// Convert rows into fee lines dated `service_date`.
///
/// Position numbers follow row order starting at 1. Totals are rounded to
/// cents and factors to one decimal, both half-up. Every row needs schedule,
/// code, quantity, text and total, plus a factor or a unit price; all
/// offending rows are reported together.
pub fn rows_to_fee_lines(
    rows: &[LineItemRow],
    service_date: NaiveDate,
) -> Result<Vec<LineItem>, PadnextError> {
    let mut errors = Vec::new();
    let mut items = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let path = format!("rows[{i}]");
        let before = errors.len();

        let schedule = match row.go.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push(missing(&path, "go"));
                None
            }
            Some(code) => {
                let schedule = FeeSchedule::from_code(&code.to_ascii_uppercase());
                if schedule.is_none() {
                    errors.push(ValidationError::with_rule(
                        format!("{path}.go"),
                        format!("unknown fee schedule '{code}'"),
                        "enumeration",
                    ));
                }
                schedule
            }
        };
        let code = non_blank(&row.code);
        if code.is_none() {
            errors.push(missing(&path, "code"));
        }
        let text = non_blank(&row.text);
        if text.is_none() {
            errors.push(missing(&path, "text"));
        }
        if row.quantity.is_none() {
            errors.push(missing(&path, "quantity"));
        }
        if row.total.is_none() {
            errors.push(missing(&path, "total"));
        }
        if row.factor.is_none() && row.unit_price.is_none() {
            errors.push(ValidationError::with_rule(
                format!("{path}.factor"),
                "either factor or unit price is required",
                "required-if",
            ));
        }

        if errors.len() > before {
            continue;
        }
        let (Some(schedule), Some(code), Some(text), Some(quantity), Some(total)) =
            (schedule, code, text, row.quantity, row.total)
        else {
            continue;
        };

        items.push(LineItem::Fee(FeeLine {
            position: PositionCore {
                position_number: Some(i as u32 + 1),
                provider_id: None,
                date: service_date,
                time: None,
                quantity,
                text: text.to_string(),
                extra_text: None,
                id: None,
                idref: None,
            },
            code: FeeCode::new(schedule, code),
            factor: row.factor.map(|f| round_half_up(f, 1)),
            reduction_rate: None,
            point_value: None,
            points: None,
            unit_price: row.unit_price,
            total: round2(total),
            vat_rate: None,
            justification: None,
            billing: None,
        }));
    }

    if errors.is_empty() {
        Ok(items)
    } else {
        Err(PadnextError::ModelConstraint(errors))
    }
}

/// Replace the line items of the batch's first case and re-derive its sums.
pub fn replace_first_case_items(
    batch: &mut InvoiceBatch,
    items: Vec<LineItem>,
) -> Result<(), PadnextError> {
    let case = batch
        .invoices
        .first_mut()
        .and_then(|invoice| invoice.cases.first_mut())
        .ok_or_else(|| PadnextError::Builder("batch has no billing case to update".into()))?;
    let core = case.core_mut();
    core.items = items;
    recalculate_sums(core).map_err(|e| {
        PadnextError::ModelConstraint(vec![ValidationError::with_rule(
            "invoices[0].cases[0].sums",
            format!("line totals cannot be summed: {e}"),
            super::validation::AMOUNT_OVERFLOW_RULE,
        )])
    })
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn missing(path: &str, field: &str) -> ValidationError {
    ValidationError::with_rule(format!("{path}.{field}"), "value is required", "required")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(code: &str, total: Decimal) -> LineItemRow {
        LineItemRow {
            go: Some("GOAE".into()),
            code: Some(code.into()),
            quantity: Some(1),
            text: Some("Untersuchung".into()),
            total: Some(total),
            factor: Some(dec!(2.345)),
            unit_price: None,
        }
    }

    #[test]
    fn rows_become_numbered_fee_lines() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let items = rows_to_fee_lines(&[row("5", dec!(10.725)), row("7", dec!(21.44))], day).unwrap();
        assert_eq!(items.len(), 2);
        let LineItem::Fee(first) = &items[0] else {
            panic!("expected a fee line");
        };
        assert_eq!(first.position.position_number, Some(1));
        assert_eq!(first.total, dec!(10.73));
        assert_eq!(first.factor, Some(dec!(2.3)));
        assert_eq!(first.position.date, day);
    }

    #[test]
    fn all_bad_rows_are_reported() {
        let mut no_price = row("1", dec!(5));
        no_price.factor = None;
        let mut no_code = row("", dec!(5));
        no_code.go = Some("XYZ".into());
        let err = rows_to_fee_lines(&[no_price, no_code], NaiveDate::default()).unwrap_err();
        let fields: Vec<_> = err.issues().iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"rows[0].factor"));
        assert!(fields.contains(&"rows[1].go"));
        assert!(fields.contains(&"rows[1].code"));
    }
}
