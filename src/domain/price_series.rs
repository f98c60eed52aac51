//! Price and returns series.
//!
//! A [`PriceSeries`] is the validated boundary type every engine consumes:
//! dates strictly ascending, no duplicates, finite prices. Anything else is
//! rejected here so the indicator and risk code can assume clean input.

use crate::domain::error::RiskawareError;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    name: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(name: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, RiskawareError> {
        let name = name.into();

        for (row, point) in points.iter().enumerate() {
            if !point.price.is_finite() {
                return Err(RiskawareError::MalformedSeries {
                    name,
                    row,
                    reason: format!("non-finite price {}", point.price),
                });
            }
            if row > 0 {
                let prev = points[row - 1].date;
                if point.date == prev {
                    return Err(RiskawareError::MalformedSeries {
                        name,
                        row,
                        reason: format!("duplicate date {}", point.date),
                    });
                }
                if point.date < prev {
                    return Err(RiskawareError::MalformedSeries {
                        name,
                        row,
                        reason: format!("date {} precedes {}", point.date, prev),
                    });
                }
            }
        }

        Ok(Self { name, points })
    }

    pub fn from_pairs(
        name: impl Into<String>,
        pairs: &[(NaiveDate, f64)],
    ) -> Result<Self, RiskawareError> {
        let points = pairs
            .iter()
            .map(|&(date, price)| PricePoint { date, price })
            .collect();
        Self::new(name, points)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Percent change between consecutive prices, dated at the later price.
    ///
    /// A zero previous price has no defined percent change; the pair is
    /// skipped and logged.
    pub fn returns(&self) -> ReturnsSeries {
        let mut points = Vec::with_capacity(self.points.len().saturating_sub(1));
        for w in self.points.windows(2) {
            let prev = w[0].price;
            if prev == 0.0 {
                tracing::warn!(series = %self.name, date = %w[1].date, "zero price, return skipped");
                continue;
            }
            points.push(ReturnPoint {
                date: w[1].date,
                value: (w[1].price - prev) / prev,
            });
        }
        ReturnsSeries { points }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReturnsSeries {
    pub points: Vec<ReturnPoint>,
}

impl ReturnsSeries {
    /// Returns without dates, for callers that only need the values.
    /// Dates are synthesised one day apart from 1970-01-01.
    pub fn from_values(values: &[f64]) -> Self {
        let epoch = NaiveDate::default();
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &value)| ReturnPoint {
                date: epoch + chrono::Duration::days(i as i64),
                value,
            })
            .collect();
        Self { points }
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
