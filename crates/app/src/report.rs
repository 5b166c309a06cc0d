//! Plain-text rendering of the monthly view.

use std::fmt;

use chrono::TimeZone;
use cuan_client::{LedgerView, SyncStatus};
use engine::{Amount, ChartSeries, TransactionKind, group_thousands};

/// Monthly view laid out for the terminal, dates shown in `tz`.
pub struct Report<'a, Tz> {
    view: &'a LedgerView,
    tz: &'a Tz,
}

impl<'a, Tz> Report<'a, Tz> {
    pub fn new(view: &'a LedgerView, tz: &'a Tz) -> Self {
        Self { view, tz }
    }
}

impl<Tz> fmt::Display for Report<'_, Tz>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.view;
        let agg = &view.aggregate;

        if let Some(email) = &view.email {
            writeln!(f, "{email}")?;
        }
        writeln!(f, "{}", view.period)?;
        match &view.status {
            SyncStatus::Failed(reason) => {
                writeln!(f, "! sync failed, showing last known data: {reason}")?;
            }
            SyncStatus::Idle | SyncStatus::Loading => writeln!(f, "! not synchronized")?,
            SyncStatus::Ready => {}
        }
        writeln!(f)?;

        writeln!(f, "Incoming  {}", agg.total_incoming)?;
        writeln!(f, "Outgoing  {}", agg.total_outgoing)?;
        writeln!(f, "Balance   Rp {}", group_thousands(agg.balance))?;
        writeln!(f, "{}", chart(&agg.chart_series))?;
        writeln!(f)?;

        if agg.filtered.is_empty() {
            return writeln!(f, "No transactions this month.");
        }
        for tx in &agg.filtered {
            let sign = match tx.kind {
                TransactionKind::Incoming => '+',
                TransactionKind::Outgoing => '-',
            };
            writeln!(
                f,
                "{:>6}  {}  {sign}{:<16}  {}",
                tx.id.as_str(),
                tx.occurred_at.with_timezone(self.tz).format("%Y-%m-%d"),
                tx.amount.to_string(),
                tx.description,
            )?;
        }
        Ok(())
    }
}

fn chart(series: &ChartSeries) -> String {
    let total = series.incoming.value + series.outgoing.value;
    if total.is_zero() {
        return "[no data]".to_string();
    }
    series
        .slices()
        .iter()
        .map(|slice| format!("{} {}%", slice.kind.as_str(), share(slice.value, total)))
        .collect::<Vec<_>>()
        .join(" / ")
}

fn share(part: Amount, total: Amount) -> i64 {
    (i128::from(part.value()) * 100 / i128::from(total.value())) as i64
}
