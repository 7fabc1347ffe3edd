use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::core::library::{PaymentMethod, TransactionKind};
use crate::fines::domain::model::TransactionEntity;
use crate::patrons::dto::PatronDto;
use crate::utils::date::serializer;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct TransactionDto {
    pub transaction_id: String,
    pub patron_id: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub method: PaymentMethod,
    #[serde(with = "serializer")]
    pub timestamp: NaiveDateTime,
    pub actor_id: String,
    pub note: Option<String>,
    pub item_title: Option<String>,
}

impl From<&TransactionEntity> for TransactionDto {
    fn from(other: &TransactionEntity) -> TransactionDto {
        TransactionDto {
            transaction_id: other.transaction_id.to_string(),
            patron_id: other.patron_id.to_string(),
            amount: other.amount,
            kind: other.kind,
            method: other.method,
            timestamp: other.timestamp,
            actor_id: other.actor_id.to_string(),
            note: other.note.clone(),
            item_title: other.item_title.clone(),
        }
    }
}

// LedgerReceiptDto is the patron after a payment or waiver with the entry that moved it.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct LedgerReceiptDto {
    pub patron: PatronDto,
    pub transaction: TransactionDto,
}

// LedgerSummaryDto totals the ledger; credits are reported as positive amounts.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub(crate) struct LedgerSummaryDto {
    pub total_collected: Decimal,
    pub total_fines_assessed: Decimal,
    pub total_replacements_assessed: Decimal,
    pub total_damage_assessed: Decimal,
    pub total_waived: Decimal,
}

impl LedgerSummaryDto {
    pub fn from_transactions(txs: &[TransactionEntity]) -> Self {
        txs.iter().fold(LedgerSummaryDto::default(), |mut acc, tx| {
            match tx.kind {
                TransactionKind::FinePayment | TransactionKind::ReplacementPayment => {
                    acc.total_collected += tx.amount.abs();
                }
                TransactionKind::FineAssessment | TransactionKind::ManualAdjustment => {
                    acc.total_fines_assessed += tx.amount;
                }
                TransactionKind::ReplacementAssessment => {
                    acc.total_replacements_assessed += tx.amount;
                }
                TransactionKind::DamageAssessment => {
                    acc.total_damage_assessed += tx.amount;
                }
                TransactionKind::Waive => {
                    acc.total_waived += tx.amount.abs();
                }
            }
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use crate::core::library::{PaymentMethod, TransactionKind};
    use crate::fines::domain::model::TransactionEntity;
    use crate::fines::dto::LedgerSummaryDto;

    #[tokio::test]
    async fn test_should_total_by_kind() {
        let now = Utc::now().naive_utc();
        let tx = |amount: i64, kind: TransactionKind| {
            TransactionEntity::new("P-1", Decimal::new(amount, 2), kind, PaymentMethod::System, "SYSTEM", now)
        };
        let summary = LedgerSummaryDto::from_transactions(&[
            tx(300, TransactionKind::FineAssessment),
            tx(100, TransactionKind::ManualAdjustment),
            tx(-150, TransactionKind::FinePayment),
            tx(-50, TransactionKind::Waive),
            tx(2000, TransactionKind::ReplacementAssessment),
            tx(500, TransactionKind::DamageAssessment),
        ]);
        assert_eq!(Decimal::new(150, 2), summary.total_collected);
        assert_eq!(Decimal::new(400, 2), summary.total_fines_assessed);
        assert_eq!(Decimal::new(2000, 2), summary.total_replacements_assessed);
        assert_eq!(Decimal::new(500, 2), summary.total_damage_assessed);
        assert_eq!(Decimal::new(50, 2), summary.total_waived);
    }
}
