use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockyard_catalog::Product;
use stockyard_core::{Entity, ProductId, ReceiptId, SlotCode, WarehouseError, WarehouseResult};

/// Header fields of a receipt, supplied when the document is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptHeader {
    pub supplier: String,
    /// Supplier's waybill / invoice number.
    pub document_number: String,
    pub manager: String,
}

/// Request to receive an existing product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Defaults to the product's current unit price.
    pub unit_price: Option<Decimal>,
    /// Defaults to the product's current location.
    pub destination: Option<SlotCode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub destination: Option<SlotCode>,
}

/// A committed receipt. `total_amount` always equals the sum of item subtotals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ReceiptId,
    pub received_at: DateTime<Utc>,
    pub supplier: String,
    pub document_number: String,
    pub manager: String,
    pub items: Vec<ReceiptItem>,
    pub total_amount: Decimal,
}

impl Entity for Receipt {
    type Id = ReceiptId;

    fn id(&self) -> ReceiptId {
        self.id
    }
}

/// A receipt being filled in. Stock is untouched until the ledger commits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptDraft {
    id: ReceiptId,
    opened_at: DateTime<Utc>,
    header: ReceiptHeader,
    items: Vec<ReceiptItem>,
}

impl ReceiptDraft {
    pub(crate) fn new(id: ReceiptId, header: ReceiptHeader, opened_at: DateTime<Utc>) -> Self {
        Self {
            id,
            opened_at,
            header,
            items: Vec::new(),
        }
    }

    pub fn id(&self) -> ReceiptId {
        self.id
    }

    pub fn header(&self) -> &ReceiptHeader {
        &self.header
    }

    pub fn items(&self) -> &[ReceiptItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_amount(&self) -> Decimal {
        self.items.iter().map(|i| i.subtotal).sum()
    }

    /// Add a line for `product`, merging with an existing line for the same
    /// product. A merged line keeps its first unit price; a newly supplied
    /// destination replaces the previous one. A missing or negative price
    /// falls back to the product's current price. Lines without a destination
    /// leave the product where it is at commit time.
    pub(crate) fn add_line(
        &mut self,
        product: &Product,
        line: ReceiptLine,
    ) -> WarehouseResult<&ReceiptItem> {
        if line.quantity == 0 {
            return Err(WarehouseError::validation("received quantity must be positive"));
        }
        let unit_price = line_price(line.unit_price, product);

        let index = match self.items.iter().position(|i| i.product_id == line.product_id) {
            Some(index) => {
                let item = &mut self.items[index];
                item.quantity = item.quantity.checked_add(line.quantity).ok_or_else(|| {
                    WarehouseError::invalid_range("receipt line quantity overflow")
                })?;
                item.subtotal = item.unit_price * Decimal::from(item.quantity);
                if line.destination.is_some() {
                    item.destination = line.destination;
                }
                index
            }
            None => {
                self.items.push(ReceiptItem {
                    product_id: line.product_id,
                    quantity: line.quantity,
                    unit_price,
                    subtotal: unit_price * Decimal::from(line.quantity),
                    destination: line.destination,
                });
                self.items.len() - 1
            }
        };
        Ok(&self.items[index])
    }

    pub(crate) fn into_receipt(self) -> Receipt {
        let total_amount = self.total_amount();
        Receipt {
            id: self.id,
            received_at: self.opened_at,
            supplier: self.header.supplier,
            document_number: self.header.document_number,
            manager: self.header.manager,
            items: self.items,
            total_amount,
        }
    }
}

/// Price for a document line: the supplied one unless it is absent or
/// negative, in which case the product's current price.
pub(crate) fn line_price(supplied: Option<Decimal>, product: &Product) -> Decimal {
    match supplied {
        Some(price) if !price.is_sign_negative() || price.is_zero() => price,
        Some(price) => {
            tracing::debug!(product_id = %product.product_id(), %price, "negative line price replaced by current price");
            product.unit_price()
        }
        None => product.unit_price(),
    }
}
