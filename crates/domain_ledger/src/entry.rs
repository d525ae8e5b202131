//! Journal entry aggregate
//!
//! A journal entry is the unit of posting: a set of debit/credit lines
//! that must balance exactly. Entries move Draft -> Posted -> Reversed
//! and are only mutable while Draft. Balance checks compare integer
//! minor units, never floats.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LedgerError;
use core_kernel::{
    AccountId, CompanyId, Currency, ExchangeRate, JournalEntryId, JournalLineId, Money, UserId,
};

/// Journal entry status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryStatus {
    /// Editable, not yet in the general ledger
    Draft,
    /// Locked, projected into the general ledger
    Posted,
    /// Terminal; flagged as reversed, rows remain
    Reversed,
}

impl EntryStatus {
    /// Returns true if a transition to the target status is allowed
    pub fn can_transition_to(&self, target: EntryStatus) -> bool {
        matches!(
            (self, target),
            (EntryStatus::Draft, EntryStatus::Posted)
                | (EntryStatus::Posted, EntryStatus::Reversed)
        )
    }

    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, EntryStatus::Reversed)
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EntryStatus::Draft => "DRAFT",
            EntryStatus::Posted => "POSTED",
            EntryStatus::Reversed => "REVERSED",
        };
        write!(f, "{}", s)
    }
}

/// Originating document for entries generated from other modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySource {
    /// Module name (e.g. "sales", "purchase")
    pub module: String,
    /// Identifier of the source document
    pub source_id: Uuid,
    /// Transaction type within the module
    pub transaction_type: String,
}

/// A single debit or credit line of a journal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntryLine {
    /// Unique identifier
    pub id: JournalLineId,
    /// Position within the entry, 1-based
    pub line_number: u32,
    /// Account being debited or credited
    pub account_id: AccountId,
    /// Debit amount in the entry currency (zero when crediting)
    pub debit_amount: Money,
    /// Credit amount in the entry currency (zero when debiting)
    pub credit_amount: Money,
    /// Debit amount converted to the base currency
    pub base_debit_amount: Money,
    /// Credit amount converted to the base currency
    pub base_credit_amount: Money,
    /// Optional line description
    pub description: Option<String>,
}

impl JournalEntryLine {
    /// Creates a debit line
    pub fn debit(account_id: AccountId, amount: Money) -> Self {
        let zero = Money::zero(amount.currency());
        Self {
            id: JournalLineId::new_v7(),
            line_number: 0,
            account_id,
            debit_amount: amount,
            credit_amount: zero,
            base_debit_amount: amount,
            base_credit_amount: zero,
            description: None,
        }
    }

    /// Creates a credit line
    pub fn credit(account_id: AccountId, amount: Money) -> Self {
        let zero = Money::zero(amount.currency());
        Self {
            id: JournalLineId::new_v7(),
            line_number: 0,
            account_id,
            debit_amount: zero,
            credit_amount: amount,
            base_debit_amount: zero,
            base_credit_amount: amount,
            description: None,
        }
    }

    /// Sets the line description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validates the line
    ///
    /// Exactly one side must carry a positive amount; negative amounts are
    /// rejected on both sides.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.debit_amount.is_negative() || self.credit_amount.is_negative() {
            return Err(LedgerError::invalid_line(format!(
                "line {}: negative amounts are not allowed",
                self.line_number
            )));
        }
        match (self.debit_amount.is_zero(), self.credit_amount.is_zero()) {
            (true, true) => Err(LedgerError::invalid_line(format!(
                "line {}: either debit or credit must be set",
                self.line_number
            ))),
            (false, false) => Err(LedgerError::invalid_line(format!(
                "line {}: debit and credit cannot both be set",
                self.line_number
            ))),
            _ => Ok(()),
        }
    }

    /// Recomputes the base-currency amounts from the entry's exchange rate
    pub fn recalculate_base(&mut self, rate: ExchangeRate, base_currency: Currency) {
        self.base_debit_amount = rate.to_base(&self.debit_amount, base_currency);
        self.base_credit_amount = rate.to_base(&self.credit_amount, base_currency);
    }
}

/// The journal entry aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier
    pub id: JournalEntryId,
    /// Human-readable entry number, unique per company
    pub entry_number: String,
    /// Company this entry belongs to
    pub company_id: CompanyId,
    /// Accounting date
    pub entry_date: NaiveDate,
    /// Description
    pub description: String,
    /// Transaction currency
    pub currency: Currency,
    /// Base (reporting) currency
    pub base_currency: Currency,
    /// Rate from transaction currency to base currency
    pub exchange_rate: ExchangeRate,
    /// Current status
    pub status: EntryStatus,
    /// Originating document, when generated from another module
    pub source: Option<EntrySource>,
    /// Lines, ordered by line_number
    pub lines: Vec<JournalEntryLine>,
    /// Sum of debit lines in the transaction currency
    pub total_debit: Money,
    /// Sum of credit lines in the transaction currency
    pub total_credit: Money,
    /// Sum of debit lines in the base currency
    pub base_total_debit: Money,
    /// Sum of credit lines in the base currency
    pub base_total_credit: Money,
    /// Who posted the entry
    pub posted_by: Option<UserId>,
    /// When the entry was posted
    pub posted_at: Option<DateTime<Utc>>,
    /// Who reversed the entry
    pub reversed_by: Option<UserId>,
    /// When the entry was reversed
    pub reversed_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Creates a new draft entry with no lines
    pub fn new(
        company_id: CompanyId,
        entry_number: impl Into<String>,
        entry_date: NaiveDate,
        description: impl Into<String>,
        currency: Currency,
        base_currency: Currency,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: JournalEntryId::new_v7(),
            entry_number: entry_number.into(),
            company_id,
            entry_date,
            description: description.into(),
            currency,
            base_currency,
            exchange_rate: ExchangeRate::unity(),
            status: EntryStatus::Draft,
            source: None,
            lines: Vec::new(),
            total_debit: Money::zero(currency),
            total_credit: Money::zero(currency),
            base_total_debit: Money::zero(base_currency),
            base_total_credit: Money::zero(base_currency),
            posted_by: None,
            posted_at: None,
            reversed_by: None,
            reversed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the exchange rate and recomputes all base amounts
    pub fn set_exchange_rate(&mut self, rate: ExchangeRate) -> Result<(), LedgerError> {
        self.ensure_draft()?;
        self.exchange_rate = rate;
        for line in &mut self.lines {
            line.recalculate_base(rate, self.base_currency);
        }
        self.calculate_totals();
        Ok(())
    }

    /// Sets the originating document
    pub fn with_source(mut self, source: EntrySource) -> Self {
        self.source = Some(source);
        self
    }

    /// Adds a line to the entry
    ///
    /// Assigns the next line number and recomputes base amounts and totals.
    ///
    /// # Errors
    ///
    /// - `EntryLocked` unless the entry is a draft
    /// - `InvalidLine` if the line currency differs from the entry currency
    ///   or the line itself is invalid
    pub fn add_line(&mut self, mut line: JournalEntryLine) -> Result<(), LedgerError> {
        self.ensure_draft()?;
        if line.debit_amount.currency() != self.currency
            || line.credit_amount.currency() != self.currency
        {
            return Err(LedgerError::invalid_line(format!(
                "line currency must be {}",
                self.currency
            )));
        }
        line.line_number = self.lines.len() as u32 + 1;
        line.validate()?;
        line.recalculate_base(self.exchange_rate, self.base_currency);
        self.lines.push(line);
        self.calculate_totals();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Removes a line and renumbers the remainder
    pub fn remove_line(&mut self, line_id: JournalLineId) -> Result<(), LedgerError> {
        self.ensure_draft()?;
        let before = self.lines.len();
        self.lines.retain(|l| l.id != line_id);
        if self.lines.len() == before {
            return Err(LedgerError::invalid_line(format!(
                "line not found: {}",
                line_id
            )));
        }
        for (index, line) in self.lines.iter_mut().enumerate() {
            line.line_number = index as u32 + 1;
        }
        self.calculate_totals();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Replaces all lines
    pub fn replace_lines(&mut self, lines: Vec<JournalEntryLine>) -> Result<(), LedgerError> {
        self.ensure_draft()?;
        self.lines.clear();
        for line in lines {
            self.add_line(line)?;
        }
        Ok(())
    }

    /// Recomputes totals from the lines
    ///
    /// Idempotent; totals are always derived, never adjusted incrementally.
    pub fn calculate_totals(&mut self) {
        let mut debit = Money::zero(self.currency);
        let mut credit = Money::zero(self.currency);
        let mut base_debit = Money::zero(self.base_currency);
        let mut base_credit = Money::zero(self.base_currency);

        for line in &self.lines {
            debit = debit + line.debit_amount;
            credit = credit + line.credit_amount;
            base_debit = base_debit + line.base_debit_amount;
            base_credit = base_credit + line.base_credit_amount;
        }

        self.total_debit = debit;
        self.total_credit = credit;
        self.base_total_debit = base_debit;
        self.base_total_credit = base_credit;
    }

    /// Returns true if total debits equal total credits in minor units
    pub fn is_balanced(&self) -> bool {
        self.total_debit.minor_units() == self.total_credit.minor_units()
    }

    /// Validates the entry for posting
    ///
    /// # Errors
    ///
    /// - `EmptyEntry` with fewer than two lines
    /// - `InvalidLine` if any line fails validation
    /// - `Unbalanced` if debits do not equal credits
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.lines.len() < 2 {
            return Err(LedgerError::EmptyEntry);
        }
        for line in &self.lines {
            line.validate()?;
        }
        if !self.is_balanced() {
            return Err(LedgerError::Unbalanced {
                debits: self.total_debit.amount(),
                credits: self.total_credit.amount(),
            });
        }
        Ok(())
    }

    /// Returns true if the entry can be posted
    pub fn can_be_posted(&self) -> bool {
        self.status.can_transition_to(EntryStatus::Posted) && self.validate().is_ok()
    }

    /// Returns true if the entry can be reversed
    pub fn can_be_reversed(&self) -> bool {
        self.status.can_transition_to(EntryStatus::Reversed)
    }

    /// Posts the entry
    ///
    /// Validates first; the caller is responsible for projecting the
    /// general ledger rows atomically with persisting the status flip.
    pub fn post(&mut self, user: UserId) -> Result<(), LedgerError> {
        if !self.status.can_transition_to(EntryStatus::Posted) {
            return Err(LedgerError::InvalidTransition {
                from: self.status.to_string(),
                to: EntryStatus::Posted.to_string(),
            });
        }
        self.validate()?;

        let now = Utc::now();
        self.status = EntryStatus::Posted;
        self.posted_by = Some(user);
        self.posted_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Reverses the entry
    ///
    /// This only flags the entry; no contra-entry is created. Callers that
    /// need the offsetting amounts post a separate entry.
    pub fn reverse(&mut self, user: UserId) -> Result<(), LedgerError> {
        if !self.status.can_transition_to(EntryStatus::Reversed) {
            return Err(LedgerError::InvalidTransition {
                from: self.status.to_string(),
                to: EntryStatus::Reversed.to_string(),
            });
        }

        let now = Utc::now();
        self.status = EntryStatus::Reversed;
        self.reversed_by = Some(user);
        self.reversed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    fn ensure_draft(&self) -> Result<(), LedgerError> {
        if self.status != EntryStatus::Draft {
            return Err(LedgerError::EntryLocked(self.entry_number.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::AccountId;
    use rust_decimal_macros::dec;

    fn draft_entry() -> JournalEntry {
        JournalEntry::new(
            CompanyId::new(),
            "JE-202501-0001",
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            "Office supplies",
            Currency::IDR,
            Currency::IDR,
        )
    }

    fn usd(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }

    fn idr(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::IDR)
    }

    #[test]
    fn transition_table_is_closed() {
        assert!(EntryStatus::Draft.can_transition_to(EntryStatus::Posted));
        assert!(EntryStatus::Posted.can_transition_to(EntryStatus::Reversed));

        assert!(!EntryStatus::Draft.can_transition_to(EntryStatus::Reversed));
        assert!(!EntryStatus::Posted.can_transition_to(EntryStatus::Draft));
        assert!(!EntryStatus::Reversed.can_transition_to(EntryStatus::Draft));
        assert!(!EntryStatus::Reversed.can_transition_to(EntryStatus::Posted));
        assert!(EntryStatus::Reversed.is_terminal());
    }

    #[test]
    fn line_requires_exactly_one_side() {
        let account = AccountId::new();

        let mut both_zero = JournalEntryLine::debit(account, idr(dec!(0)));
        both_zero.line_number = 1;
        assert!(matches!(
            both_zero.validate(),
            Err(LedgerError::InvalidLine(_))
        ));

        let mut both_set = JournalEntryLine::debit(account, idr(dec!(100)));
        both_set.credit_amount = idr(dec!(100));
        both_set.line_number = 1;
        assert!(matches!(
            both_set.validate(),
            Err(LedgerError::InvalidLine(_))
        ));

        let mut negative = JournalEntryLine::debit(account, idr(dec!(-5)));
        negative.line_number = 1;
        assert!(matches!(
            negative.validate(),
            Err(LedgerError::InvalidLine(_))
        ));
    }

    #[test]
    fn balanced_entry_posts() {
        let mut entry = draft_entry();
        let cash = AccountId::new();
        let expense = AccountId::new();

        entry
            .add_line(JournalEntryLine::debit(expense, idr(dec!(100))))
            .unwrap();
        entry
            .add_line(JournalEntryLine::credit(cash, idr(dec!(100))))
            .unwrap();

        assert!(entry.is_balanced());
        assert!(entry.can_be_posted());

        let user = UserId::new();
        entry.post(user).unwrap();
        assert_eq!(entry.status, EntryStatus::Posted);
        assert_eq!(entry.posted_by, Some(user));
        assert!(entry.posted_at.is_some());
    }

    #[test]
    fn unbalanced_entry_fails_with_totals() {
        let mut entry = draft_entry();
        entry
            .add_line(JournalEntryLine::debit(AccountId::new(), idr(dec!(100))))
            .unwrap();
        entry
            .add_line(JournalEntryLine::credit(AccountId::new(), idr(dec!(90))))
            .unwrap();

        match entry.post(UserId::new()) {
            Err(LedgerError::Unbalanced { debits, credits }) => {
                assert_eq!(debits, dec!(100));
                assert_eq!(credits, dec!(90));
            }
            other => panic!("expected Unbalanced, got {:?}", other),
        }
        assert_eq!(entry.status, EntryStatus::Draft);
    }

    #[test]
    fn single_line_entry_is_empty() {
        let mut entry = draft_entry();
        entry
            .add_line(JournalEntryLine::debit(AccountId::new(), idr(dec!(100))))
            .unwrap();
        assert!(matches!(entry.validate(), Err(LedgerError::EmptyEntry)));
    }

    #[test]
    fn posted_entry_rejects_mutation() {
        let mut entry = draft_entry();
        entry
            .add_line(JournalEntryLine::debit(AccountId::new(), idr(dec!(50))))
            .unwrap();
        entry
            .add_line(JournalEntryLine::credit(AccountId::new(), idr(dec!(50))))
            .unwrap();
        entry.post(UserId::new()).unwrap();

        let result = entry.add_line(JournalEntryLine::debit(AccountId::new(), idr(dec!(1))));
        assert!(matches!(result, Err(LedgerError::EntryLocked(_))));
    }

    #[test]
    fn reverse_is_flag_only() {
        let mut entry = draft_entry();
        entry
            .add_line(JournalEntryLine::debit(AccountId::new(), idr(dec!(50))))
            .unwrap();
        entry
            .add_line(JournalEntryLine::credit(AccountId::new(), idr(dec!(50))))
            .unwrap();
        entry.post(UserId::new()).unwrap();

        let user = UserId::new();
        entry.reverse(user).unwrap();
        assert_eq!(entry.status, EntryStatus::Reversed);
        assert_eq!(entry.reversed_by, Some(user));
        // lines untouched
        assert_eq!(entry.lines.len(), 2);
        assert_eq!(entry.total_debit.amount(), dec!(50));
    }

    #[test]
    fn draft_cannot_be_reversed() {
        let mut entry = draft_entry();
        assert!(matches!(
            entry.reverse(UserId::new()),
            Err(LedgerError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn exchange_rate_recomputes_base_amounts() {
        let mut entry = JournalEntry::new(
            CompanyId::new(),
            "JE-202501-0002",
            NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
            "USD invoice",
            Currency::USD,
            Currency::IDR,
        );
        entry
            .add_line(JournalEntryLine::debit(AccountId::new(), usd(dec!(10))))
            .unwrap();
        entry
            .add_line(JournalEntryLine::credit(AccountId::new(), usd(dec!(10))))
            .unwrap();

        entry
            .set_exchange_rate(ExchangeRate::new(dec!(15000)).unwrap())
            .unwrap();

        assert_eq!(entry.base_total_debit.amount(), dec!(150000));
        assert_eq!(entry.base_total_debit.currency(), Currency::IDR);
        assert_eq!(entry.base_total_credit.amount(), dec!(150000));
        // transaction totals unchanged
        assert_eq!(entry.total_debit.amount(), dec!(10));
    }

    #[test]
    fn remove_line_renumbers() {
        let mut entry = draft_entry();
        let a = JournalEntryLine::debit(AccountId::new(), idr(dec!(10)));
        let b = JournalEntryLine::credit(AccountId::new(), idr(dec!(10)));
        let a_id = a.id;
        entry.add_line(a).unwrap();
        entry.add_line(b).unwrap();

        entry.remove_line(a_id).unwrap();
        assert_eq!(entry.lines.len(), 1);
        assert_eq!(entry.lines[0].line_number, 1);
        assert_eq!(entry.total_debit.amount(), dec!(0));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use core_kernel::AccountId;
    use proptest::prelude::*;

    proptest! {
        /// An entry built from mirrored debit/credit pairs always balances
        /// and validates, regardless of the amounts.
        #[test]
        fn mirrored_lines_always_balance(
            amounts in proptest::collection::vec(1i64..10_000_000i64, 1..8)
        ) {
            let mut entry = JournalEntry::new(
                CompanyId::new(),
                "JE-202501-9999",
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                "generated",
                Currency::IDR,
                Currency::IDR,
            );
            for minor in &amounts {
                let amount = Money::from_minor(*minor, Currency::IDR);
                entry.add_line(JournalEntryLine::debit(AccountId::new(), amount)).unwrap();
                entry.add_line(JournalEntryLine::credit(AccountId::new(), amount)).unwrap();
            }
            prop_assert!(entry.is_balanced());
            prop_assert!(entry.validate().is_ok());
        }

        /// Perturbing one credit line by any non-zero amount breaks the balance.
        #[test]
        fn perturbed_entry_never_balances(
            amount in 1i64..1_000_000i64,
            delta in 1i64..1_000i64,
        ) {
            let mut entry = JournalEntry::new(
                CompanyId::new(),
                "JE-202501-9998",
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                "generated",
                Currency::IDR,
                Currency::IDR,
            );
            entry.add_line(JournalEntryLine::debit(
                AccountId::new(),
                Money::from_minor(amount, Currency::IDR),
            )).unwrap();
            entry.add_line(JournalEntryLine::credit(
                AccountId::new(),
                Money::from_minor(amount + delta, Currency::IDR),
            )).unwrap();
            prop_assert!(!entry.is_balanced());
            prop_assert!(
                matches!(entry.validate(), Err(LedgerError::Unbalanced { .. })),
                "expected Unbalanced error",
            );
        }
    }
}
