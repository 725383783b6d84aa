use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockyard_core::{Entity, ExpenditureId, ProductId, SlotCode, WarehouseError, WarehouseResult};

/// Why stock leaves the warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpenditurePurpose {
    Sale,
    WriteOff,
    InternalUse,
    ReturnToSupplier,
    Relocation,
}

impl ExpenditurePurpose {
    pub const ALL: [ExpenditurePurpose; 5] = [
        ExpenditurePurpose::Sale,
        ExpenditurePurpose::WriteOff,
        ExpenditurePurpose::InternalUse,
        ExpenditurePurpose::ReturnToSupplier,
        ExpenditurePurpose::Relocation,
    ];

    /// Map a menu code (`"1"`..`"5"`) or a name to a purpose.
    ///
    /// Anything unrecognized is a sale.
    pub fn from_input(input: &str) -> Self {
        let normalized = input.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "1" | "sale" => Self::Sale,
            "2" | "write-off" | "writeoff" => Self::WriteOff,
            "3" | "internal-use" => Self::InternalUse,
            "4" | "return-to-supplier" => Self::ReturnToSupplier,
            "5" | "relocation" => Self::Relocation,
            _ => Self::Sale,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::WriteOff => "write-off",
            Self::InternalUse => "internal-use",
            Self::ReturnToSupplier => "return-to-supplier",
            Self::Relocation => "relocation",
        }
    }
}

impl core::fmt::Display for ExpenditurePurpose {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenditureHeader {
    pub customer: String,
    pub document_number: String,
    pub purpose: ExpenditurePurpose,
    pub responsible: String,
}

/// Request to issue units of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenditureLine {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Defaults to the product's current unit price.
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenditureItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    /// The product's location when the units were first taken.
    pub from_location: Option<SlotCode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expenditure {
    pub id: ExpenditureId,
    pub issued_at: DateTime<Utc>,
    pub customer: String,
    pub document_number: String,
    pub purpose: ExpenditurePurpose,
    pub responsible: String,
    pub items: Vec<ExpenditureItem>,
    pub total_amount: Decimal,
}

impl Entity for Expenditure {
    type Id = ExpenditureId;

    fn id(&self) -> ExpenditureId {
        self.id
    }
}

/// An expenditure being filled in.
///
/// Unlike receipts, every accepted line has already been taken out of stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenditureDraft {
    id: ExpenditureId,
    opened_at: DateTime<Utc>,
    header: ExpenditureHeader,
    items: Vec<ExpenditureItem>,
}

impl ExpenditureDraft {
    pub(crate) fn new(
        id: ExpenditureId,
        header: ExpenditureHeader,
        opened_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            opened_at,
            header,
            items: Vec::new(),
        }
    }

    pub fn id(&self) -> ExpenditureId {
        self.id
    }

    pub fn header(&self) -> &ExpenditureHeader {
        &self.header
    }

    pub fn items(&self) -> &[ExpenditureItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_amount(&self) -> Decimal {
        self.items.iter().map(|i| i.subtotal).sum()
    }

    pub(crate) fn record(
        &mut self,
        product_id: ProductId,
        quantity: u32,
        unit_price: Decimal,
        from_location: Option<SlotCode>,
    ) -> WarehouseResult<&ExpenditureItem> {
        let index = match self.items.iter().position(|i| i.product_id == product_id) {
            Some(index) => {
                let item = &mut self.items[index];
                item.quantity = item.quantity.checked_add(quantity).ok_or_else(|| {
                    WarehouseError::invalid_range("expenditure line quantity overflow")
                })?;
                item.subtotal = item.unit_price * Decimal::from(item.quantity);
                index
            }
            None => {
                self.items.push(ExpenditureItem {
                    product_id,
                    quantity,
                    unit_price,
                    subtotal: unit_price * Decimal::from(quantity),
                    from_location,
                });
                self.items.len() - 1
            }
        };
        Ok(&self.items[index])
    }

    pub(crate) fn into_expenditure(self) -> Expenditure {
        let total_amount = self.total_amount();
        Expenditure {
            id: self.id,
            issued_at: self.opened_at,
            customer: self.header.customer,
            document_number: self.header.document_number,
            purpose: self.header.purpose,
            responsible: self.header.responsible,
            items: self.items,
            total_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purpose_accepts_menu_codes_and_names() {
        assert_eq!(ExpenditurePurpose::from_input("2"), ExpenditurePurpose::WriteOff);
        assert_eq!(ExpenditurePurpose::from_input(" Internal_Use "), ExpenditurePurpose::InternalUse);
        assert_eq!(
            ExpenditurePurpose::from_input("return-to-supplier"),
            ExpenditurePurpose::ReturnToSupplier
        );
        assert_eq!(ExpenditurePurpose::from_input("5"), ExpenditurePurpose::Relocation);
    }

    #[test]
    fn unknown_purpose_falls_back_to_sale() {
        for input in ["", "9", "gift", "0"] {
            assert_eq!(ExpenditurePurpose::from_input(input), ExpenditurePurpose::Sale);
        }
    }

    #[test]
    fn purpose_names_round_trip_through_from_input() {
        for purpose in ExpenditurePurpose::ALL {
            assert_eq!(ExpenditurePurpose::from_input(purpose.as_str()), purpose);
        }
    }

    #[test]
    fn purpose_serializes_kebab_case() {
        let json = serde_json::to_string(&ExpenditurePurpose::ReturnToSupplier).unwrap();
        assert_eq!(json, "\"return-to-supplier\"");
    }
}
