//! Transaction primitives.
//!
//! A `Transaction` is a single income or expense entry of the ledger. The
//! store assigns its id and it is never edited in place: the only write
//! operations are create and delete.

use api_types::transaction::{
    TransactionId, TransactionInsert, TransactionKind as ApiKind, TransactionRecord,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::{Amount, InputError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Incoming,
    Outgoing,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = InputError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "incoming" | "in" | "masuk" => Ok(Self::Incoming),
            "outgoing" | "out" | "keluar" => Ok(Self::Outgoing),
            other => Err(InputError::InvalidKind(other.to_string())),
        }
    }
}

impl From<ApiKind> for TransactionKind {
    fn from(value: ApiKind) -> Self {
        match value {
            ApiKind::Incoming => Self::Incoming,
            ApiKind::Outgoing => Self::Outgoing,
        }
    }
}

impl From<TransactionKind> for ApiKind {
    fn from(value: TransactionKind) -> Self {
        match value {
            TransactionKind::Incoming => Self::Incoming,
            TransactionKind::Outgoing => Self::Outgoing,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    pub description: String,
    pub amount: Amount,
    pub kind: TransactionKind,
    pub occurred_at: DateTime<Utc>,
    pub owner_id: Uuid,
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = InputError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            description: record.description,
            amount: Amount::new(record.amount)?,
            kind: record.kind.into(),
            occurred_at: record.occurred_at.with_timezone(&Utc),
            owner_id: record.owner_id,
        })
    }
}

/// Raw form fields as typed by the user.
#[derive(Clone, Debug, Default)]
pub struct TransactionInput {
    pub description: String,
    pub amount: String,
    pub kind: Option<TransactionKind>,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
}

/// A validated, not yet stored transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: Amount,
    pub kind: TransactionKind,
    pub occurred_at: DateTime<Utc>,
}

impl TransactionDraft {
    /// Validates form input.
    ///
    /// The date is read as a calendar day of the observer's calendar `tz` and
    /// converted to the instant of its local midnight, so the entry always
    /// lands in the month the user picked.
    pub fn parse<Tz: TimeZone>(input: &TransactionInput, tz: &Tz) -> Result<Self, InputError> {
        let description = input.description.trim();
        if description.is_empty() {
            return Err(InputError::MissingDescription);
        }
        let amount: Amount = input.amount.parse()?;
        let kind = input.kind.unwrap_or(TransactionKind::Incoming);
        let occurred_at = local_midnight(input.date.trim(), tz)?;

        Ok(Self {
            description: description.to_string(),
            amount,
            kind,
            occurred_at,
        })
    }

    pub fn into_insert(self, owner_id: Uuid) -> TransactionInsert {
        TransactionInsert {
            description: self.description,
            amount: self.amount.value(),
            kind: self.kind.into(),
            occurred_at: self.occurred_at.fixed_offset(),
            owner_id,
        }
    }
}

fn local_midnight<Tz: TimeZone>(date: &str, tz: &Tz) -> Result<DateTime<Utc>, InputError> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|err| InputError::InvalidDate(format!("{date:?}: {err}")))?;
    let midnight = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| InputError::InvalidDate(date.to_string()))?;
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| InputError::InvalidDate(format!("{date} has no local midnight")))
}

#[cfg(test)]
mod tests {
    use chrono_tz::Asia::Jakarta;

    use super::*;

    fn input(description: &str, amount: &str, date: &str) -> TransactionInput {
        TransactionInput {
            description: description.to_string(),
            amount: amount.to_string(),
            kind: Some(TransactionKind::Outgoing),
            date: date.to_string(),
        }
    }

    #[test]
    fn parse_converts_date_to_local_midnight() {
        let draft = TransactionDraft::parse(&input(" Nasi Goreng ", "25.000", "2024-05-01"), &Jakarta)
            .unwrap();
        assert_eq!(draft.description, "Nasi Goreng");
        assert_eq!(draft.amount.value(), 25_000);
        assert_eq!(
            draft.occurred_at,
            Utc.with_ymd_and_hms(2024, 4, 30, 17, 0, 0).unwrap()
        );
    }

    #[test]
    fn parse_requires_description_and_amount() {
        assert_eq!(
            TransactionDraft::parse(&input("  ", "10", "2024-05-01"), &Utc),
            Err(InputError::MissingDescription)
        );
        assert_eq!(
            TransactionDraft::parse(&input("Kopi", "", "2024-05-01"), &Utc),
            Err(InputError::MissingAmount)
        );
    }

    #[test]
    fn parse_rejects_bad_date() {
        assert!(matches!(
            TransactionDraft::parse(&input("Kopi", "10", "01/05/2024"), &Utc),
            Err(InputError::InvalidDate(_))
        ));
    }

    #[test]
    fn kind_accepts_aliases() {
        assert_eq!(TransactionKind::try_from("Masuk").unwrap(), TransactionKind::Incoming);
        assert_eq!(TransactionKind::try_from("out").unwrap(), TransactionKind::Outgoing);
        assert!(TransactionKind::try_from("refund").is_err());
    }

    #[test]
    fn record_with_negative_amount_is_rejected() {
        let record = TransactionRecord {
            id: TransactionId::from("1"),
            description: "x".to_string(),
            amount: -5,
            kind: ApiKind::Outgoing,
            occurred_at: Utc::now().fixed_offset(),
            owner_id: Uuid::nil(),
        };
        assert!(Transaction::try_from(record).is_err());
    }
}
