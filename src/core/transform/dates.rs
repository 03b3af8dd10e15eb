use crate::domain::model::{Cell, Table};
use crate::utils::error::{Result, SheetError};
use chrono::NaiveDate;

pub const DATE_COLUMN: &str = "Date";
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Every day from `start` to `end`, both included, as `DD/MM/YYYY`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Result<Table> {
    if start > end {
        return Err(SheetError::InvalidConfigValueError {
            field: "start".to_string(),
            value: start.to_string(),
            reason: format!("Start date must not be after end date ({})", end),
        });
    }

    let rows = start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|day| vec![Cell::Text(day.format(DATE_FORMAT).to_string())])
        .collect();

    Ok(Table::new(vec![DATE_COLUMN.to_string()], rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_crosses_month() {
        let table = date_range(ymd(2024, 1, 30), ymd(2024, 2, 2)).unwrap();
        let dates: Vec<String> = (0..table.len()).map(|r| table.cell_text(r, 0)).collect();
        assert_eq!(
            dates,
            vec!["30/01/2024", "31/01/2024", "01/02/2024", "02/02/2024"]
        );
        assert_eq!(table.headers, vec!["Date"]);
    }

    #[test]
    fn test_date_range_single_day_and_leap_year() {
        assert_eq!(date_range(ymd(2024, 3, 1), ymd(2024, 3, 1)).unwrap().len(), 1);
        let table = date_range(ymd(2024, 2, 28), ymd(2024, 3, 1)).unwrap();
        assert_eq!(table.cell_text(1, 0), "29/02/2024");
    }

    #[test]
    fn test_date_range_rejects_reversed() {
        assert!(matches!(
            date_range(ymd(2024, 2, 2), ymd(2024, 1, 30)),
            Err(SheetError::InvalidConfigValueError { .. })
        ));
    }
}
