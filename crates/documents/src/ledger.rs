//! The document ledger: receipts and expenditures, open and committed.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use stockyard_catalog::{Catalog, NewProduct};
use stockyard_core::{
    ExpenditureId, IdSequence, ProductId, ReceiptId, SlotCode, WarehouseError, WarehouseResult,
    find_by_id,
};
use stockyard_locations::LocationGrid;

use crate::expenditure::{
    Expenditure, ExpenditureDraft, ExpenditureHeader, ExpenditureItem, ExpenditureLine,
};
use crate::receipt::{Receipt, ReceiptDraft, ReceiptHeader, ReceiptItem, ReceiptLine, line_price};

/// Owns every receipt and expenditure document.
///
/// Documents are opened as drafts (the id is issued at that point and stays
/// consumed even if the draft is discarded), filled line by line, then
/// committed. Receipts touch stock on commit; expenditures touch stock as each
/// line is accepted.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    receipts: Vec<Receipt>,
    expenditures: Vec<Expenditure>,
    open_receipts: BTreeMap<ReceiptId, ReceiptDraft>,
    open_expenditures: BTreeMap<ExpenditureId, ExpenditureDraft>,
    receipt_ids: IdSequence<ReceiptId>,
    expenditure_ids: IdSequence<ExpenditureId>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- receipts -------------------------------------------------------

    pub fn open_receipt(&mut self, header: ReceiptHeader, at: DateTime<Utc>) -> ReceiptId {
        let id = self.receipt_ids.next_id();
        self.open_receipts.insert(id, ReceiptDraft::new(id, header, at));
        tracing::debug!(receipt_id = %id, "receipt opened");
        id
    }

    pub fn receipt_draft(&self, id: ReceiptId) -> WarehouseResult<&ReceiptDraft> {
        self.open_receipts
            .get(&id)
            .ok_or_else(|| WarehouseError::not_found(format!("open receipt {id}")))
    }

    /// Add (or merge) a line for an existing product.
    pub fn add_receipt_item(
        &mut self,
        id: ReceiptId,
        catalog: &Catalog,
        line: ReceiptLine,
    ) -> WarehouseResult<&ReceiptItem> {
        let draft = self.receipt_draft_mut(id)?;
        let product = catalog.find_by_id(line.product_id)?;
        let item = draft.add_line(product, line)?;
        tracing::debug!(receipt_id = %id, product_id = %item.product_id, quantity = item.quantity, "receipt line added");
        Ok(item)
    }

    /// Create a product in the catalog and add a receipt line for it.
    ///
    /// The product starts at quantity 0; committing the receipt adds
    /// `quantity`. A blank supplier defaults to the receipt's supplier.
    pub fn add_receipt_new_product(
        &mut self,
        id: ReceiptId,
        catalog: &mut Catalog,
        mut product: NewProduct,
        quantity: u32,
        at: DateTime<Utc>,
    ) -> WarehouseResult<ProductId> {
        let draft = self.receipt_draft_mut(id)?;
        if quantity == 0 {
            return Err(WarehouseError::validation("received quantity must be positive"));
        }
        product.quantity = 0;
        if product.supplier.trim().is_empty() {
            product.supplier = draft.header().supplier.clone();
        }
        let unit_price = product.unit_price;
        let destination = product.location;

        let product_id = catalog.add(product, at)?;
        draft.add_line(
            catalog.find_by_id(product_id)?,
            ReceiptLine {
                product_id,
                quantity,
                unit_price: Some(unit_price),
                destination,
            },
        )?;
        tracing::debug!(receipt_id = %id, product_id = %product_id, quantity, "receipt line added for new product");
        Ok(product_id)
    }

    /// Commit an open receipt: book it, add every line's quantity to its
    /// product, move products to supplied destinations, then recompute grid
    /// occupancy. An empty draft stays open.
    pub fn commit_receipt(
        &mut self,
        id: ReceiptId,
        catalog: &mut Catalog,
        grid: &mut LocationGrid,
        at: DateTime<Utc>,
    ) -> WarehouseResult<&Receipt> {
        let draft = self.receipt_draft(id)?;
        if draft.is_empty() {
            return Err(WarehouseError::EmptyDocument);
        }
        // Check every line before touching stock so a failed commit changes nothing.
        for item in draft.items() {
            let product = catalog.find_by_id(item.product_id)?;
            if product.quantity().checked_add(item.quantity).is_none() {
                return Err(WarehouseError::invalid_range(format!(
                    "stock overflow for product {}",
                    item.product_id
                )));
            }
        }

        let Some(draft) = self.open_receipts.remove(&id) else {
            return Err(WarehouseError::not_found(format!("open receipt {id}")));
        };
        for item in draft.items() {
            catalog.receive_stock(item.product_id, item.quantity, item.destination, at)?;
        }
        let receipt = draft.into_receipt();
        tracing::info!(
            receipt_id = %receipt.id,
            supplier = %receipt.supplier,
            items = receipt.items.len(),
            total = %receipt.total_amount,
            "receipt committed"
        );
        self.receipts.push(receipt);
        grid.recompute_occupancy(catalog);

        self.receipt(id)
    }

    pub fn discard_receipt(&mut self, id: ReceiptId) -> WarehouseResult<ReceiptDraft> {
        let draft = self
            .open_receipts
            .remove(&id)
            .ok_or_else(|| WarehouseError::not_found(format!("open receipt {id}")))?;
        tracing::info!(receipt_id = %id, items = draft.items().len(), "receipt discarded");
        Ok(draft)
    }

    pub fn receipt(&self, id: ReceiptId) -> WarehouseResult<&Receipt> {
        find_by_id(&self.receipts, id)
            .ok_or_else(|| WarehouseError::not_found(format!("receipt {id}")))
    }

    /// Committed receipts, newest first.
    pub fn receipts(&self) -> Vec<&Receipt> {
        let mut receipts: Vec<&Receipt> = self.receipts.iter().collect();
        receipts.sort_by(|a, b| b.received_at.cmp(&a.received_at).then(b.id.cmp(&a.id)));
        receipts
    }

    pub fn total_received(&self) -> Decimal {
        self.receipts.iter().map(|r| r.total_amount).sum()
    }

    // ---- expenditures ---------------------------------------------------

    pub fn open_expenditure(
        &mut self,
        header: ExpenditureHeader,
        at: DateTime<Utc>,
    ) -> ExpenditureId {
        let id = self.expenditure_ids.next_id();
        self.open_expenditures
            .insert(id, ExpenditureDraft::new(id, header, at));
        tracing::debug!(expenditure_id = %id, "expenditure opened");
        id
    }

    pub fn expenditure_draft(&self, id: ExpenditureId) -> WarehouseResult<&ExpenditureDraft> {
        self.open_expenditures
            .get(&id)
            .ok_or_else(|| WarehouseError::not_found(format!("open expenditure {id}")))
    }

    /// Take units out of stock and record them on the draft.
    ///
    /// Fails with `InsufficientStock` (and changes nothing) when more units are
    /// requested than the product currently holds.
    pub fn add_expenditure_item(
        &mut self,
        id: ExpenditureId,
        catalog: &mut Catalog,
        line: ExpenditureLine,
    ) -> WarehouseResult<&ExpenditureItem> {
        if !self.open_expenditures.contains_key(&id) {
            return Err(WarehouseError::not_found(format!("open expenditure {id}")));
        }
        if line.quantity == 0 {
            return Err(WarehouseError::validation("issued quantity must be positive"));
        }
        let product = catalog.find_by_id(line.product_id)?;
        let unit_price = line_price(line.unit_price, product);
        let from_location = product.location();

        catalog.issue_stock(line.product_id, line.quantity)?;

        let draft = self.expenditure_draft_mut(id)?;
        let item = match draft.record(line.product_id, line.quantity, unit_price, from_location) {
            Ok(item) => item,
            Err(e) => {
                catalog.restore_stock(line.product_id, line.quantity)?;
                return Err(e);
            }
        };
        tracing::debug!(expenditure_id = %id, product_id = %item.product_id, quantity = line.quantity, "expenditure line added");
        Ok(item)
    }

    /// Book an open expenditure. Stock was already reduced line by line.
    pub fn commit_expenditure(&mut self, id: ExpenditureId) -> WarehouseResult<&Expenditure> {
        let draft = self.expenditure_draft(id)?;
        if draft.is_empty() {
            return Err(WarehouseError::EmptyDocument);
        }
        let Some(draft) = self.open_expenditures.remove(&id) else {
            return Err(WarehouseError::not_found(format!("open expenditure {id}")));
        };
        let expenditure = draft.into_expenditure();
        tracing::info!(
            expenditure_id = %expenditure.id,
            purpose = %expenditure.purpose,
            items = expenditure.items.len(),
            total = %expenditure.total_amount,
            "expenditure committed"
        );
        self.expenditures.push(expenditure);
        self.expenditure(id)
    }

    /// Drop an open expenditure and put its units back into stock.
    pub fn discard_expenditure(
        &mut self,
        id: ExpenditureId,
        catalog: &mut Catalog,
    ) -> WarehouseResult<ExpenditureDraft> {
        let draft = self
            .open_expenditures
            .remove(&id)
            .ok_or_else(|| WarehouseError::not_found(format!("open expenditure {id}")))?;
        for item in draft.items() {
            if let Err(e) = catalog.restore_stock(item.product_id, item.quantity) {
                tracing::warn!(expenditure_id = %id, product_id = %item.product_id, error = %e, "could not return stock");
            }
        }
        tracing::info!(expenditure_id = %id, items = draft.items().len(), "expenditure discarded");
        Ok(draft)
    }

    pub fn expenditure(&self, id: ExpenditureId) -> WarehouseResult<&Expenditure> {
        find_by_id(&self.expenditures, id)
            .ok_or_else(|| WarehouseError::not_found(format!("expenditure {id}")))
    }

    /// Committed expenditures, newest first.
    pub fn expenditures(&self) -> Vec<&Expenditure> {
        let mut expenditures: Vec<&Expenditure> = self.expenditures.iter().collect();
        expenditures.sort_by(|a, b| b.issued_at.cmp(&a.issued_at).then(b.id.cmp(&a.id)));
        expenditures
    }

    pub fn total_issued(&self) -> Decimal {
        self.expenditures.iter().map(|e| e.total_amount).sum()
    }

    /// True when an open draft has a line for `product_id`.
    pub fn has_open_line_for(&self, product_id: ProductId) -> bool {
        self.open_receipts
            .values()
            .any(|d| d.items().iter().any(|i| i.product_id == product_id))
            || self
                .open_expenditures
                .values()
                .any(|d| d.items().iter().any(|i| i.product_id == product_id))
    }

    /// Destinations claimed by lines of open receipts, with the claiming product.
    pub fn pending_destinations(&self) -> impl Iterator<Item = (ProductId, SlotCode)> + '_ {
        self.open_receipts.values().flat_map(|d| {
            d.items()
                .iter()
                .filter_map(|i| i.destination.map(|code| (i.product_id, code)))
        })
    }

    fn receipt_draft_mut(&mut self, id: ReceiptId) -> WarehouseResult<&mut ReceiptDraft> {
        self.open_receipts
            .get_mut(&id)
            .ok_or_else(|| WarehouseError::not_found(format!("open receipt {id}")))
    }

    fn expenditure_draft_mut(&mut self, id: ExpenditureId) -> WarehouseResult<&mut ExpenditureDraft> {
        self.open_expenditures
            .get_mut(&id)
            .ok_or_else(|| WarehouseError::not_found(format!("open expenditure {id}")))
    }
}
