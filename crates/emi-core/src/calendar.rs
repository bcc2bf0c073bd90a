//! Due dates for schedule rows.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::amortization::AmortizationEntry;
use crate::error::EmiError;
use crate::types::Money;
use crate::EmiResult;

/// A schedule row with the date its installment falls due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedEntry {
    pub month: u32,
    pub due_date: NaiveDate,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub remaining_balance: Money,
}

/// Month `k` falls due `k - 1` calendar months after `first_due`. Days past
/// the end of a shorter month clamp to its last day (31 Jan → 28/29 Feb).
pub fn date_schedule(
    schedule: &[AmortizationEntry],
    first_due: NaiveDate,
) -> EmiResult<Vec<DatedEntry>> {
    schedule
        .iter()
        .map(|entry| {
            let offset = entry.month.saturating_sub(1);
            let due_date = first_due
                .checked_add_months(Months::new(offset))
                .ok_or_else(|| {
                    EmiError::DateError(format!(
                        "due date for month {} is out of range",
                        entry.month
                    ))
                })?;
            Ok(DatedEntry {
                month: entry.month,
                due_date,
                principal_paid: entry.principal_paid,
                interest_paid: entry.interest_paid,
                remaining_balance: entry.remaining_balance,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn rows(n: u32) -> Vec<AmortizationEntry> {
        (1..=n)
            .map(|month| AmortizationEntry {
                month,
                principal_paid: Decimal::ONE,
                interest_paid: Decimal::ONE,
                remaining_balance: Decimal::from(n - month),
            })
            .collect()
    }

    #[test]
    fn test_monthly_due_dates() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let dated = date_schedule(&rows(3), start).unwrap();
        assert_eq!(dated[0].due_date, start);
        assert_eq!(dated[1].due_date, NaiveDate::from_ymd_opt(2026, 2, 5).unwrap());
        assert_eq!(dated[2].due_date, NaiveDate::from_ymd_opt(2026, 3, 5).unwrap());
    }

    #[test]
    fn test_month_end_clamps() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let dated = date_schedule(&rows(2), start).unwrap();
        assert_eq!(dated[1].due_date, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
    }

    #[test]
    fn test_out_of_range_date() {
        let dated = date_schedule(&rows(2), NaiveDate::MAX);
        assert!(matches!(dated, Err(EmiError::DateError(_))));
    }
}
