//! Receipt and expenditure documents.
//!
//! The [`Ledger`] applies document effects to the catalog: receipts add stock
//! (and may move products) when committed, expenditures take stock out as each
//! line is accepted.

pub mod expenditure;
pub mod ledger;
pub mod receipt;

pub use expenditure::{
    Expenditure, ExpenditureDraft, ExpenditureHeader, ExpenditureItem, ExpenditureLine,
    ExpenditurePurpose,
};
pub use ledger::Ledger;
pub use receipt::{Receipt, ReceiptDraft, ReceiptHeader, ReceiptItem, ReceiptLine};
