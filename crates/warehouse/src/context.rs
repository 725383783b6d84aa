//! The single-writer warehouse context.

use chrono::{DateTime, Utc};

use stockyard_analytics::{
    AbcAnalysis, EfficiencyReport, FinancialReport, InventorySummary, MovementReport,
    OccupancyStats, RelocationPlan, SupplierReport, classify, efficiency_report, financial_report,
    inventory_summary, movement_report, occupancy_stats, plan_automatic, plan_by_category,
    supplier_report,
};
use stockyard_catalog::{Catalog, NewProduct, Product, ProductPatch, StockAlert};
use stockyard_core::{
    CheckId, ExpenditureId, ProductId, ReceiptId, SlotCode, WarehouseConfig, WarehouseError,
    WarehouseResult,
};
use stockyard_documents::{
    Expenditure, ExpenditureDraft, ExpenditureHeader, ExpenditureItem, ExpenditureLine, Ledger,
    Receipt, ReceiptDraft, ReceiptHeader, ReceiptItem, ReceiptLine,
};
use stockyard_inventory::{CheckSummary, CountLine, InventoryCheck, ReconciliationEngine};
use stockyard_locations::{LocationGrid, OccupancyReport};

/// Catalog, grid, ledger and reconciliation state, mutated together.
///
/// Every operation that can change a product's location or existence
/// re-derives grid occupancy before returning. Slot assignments made here are
/// checked: a code must be on the grid and not held (or claimed by an open
/// receipt) by another product.
#[derive(Debug, Clone)]
pub struct Warehouse {
    config: WarehouseConfig,
    catalog: Catalog,
    grid: LocationGrid,
    ledger: Ledger,
    checks: ReconciliationEngine,
}

impl Warehouse {
    pub fn new(config: WarehouseConfig) -> WarehouseResult<Self> {
        config.validate()?;
        let grid = LocationGrid::initialize(&config.grid)?;
        tracing::info!(slots = grid.len(), zones = ?grid.zones(), "warehouse initialized");
        Ok(Self {
            config,
            catalog: Catalog::new(),
            grid,
            ledger: Ledger::new(),
            checks: ReconciliationEngine::new(),
        })
    }

    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn grid(&self) -> &LocationGrid {
        &self.grid
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn checks(&self) -> &ReconciliationEngine {
        &self.checks
    }

    // ---- catalog --------------------------------------------------------

    pub fn add_product(&mut self, new: NewProduct, at: DateTime<Utc>) -> WarehouseResult<ProductId> {
        if let Some(code) = &new.location {
            self.ensure_slot_free(code, None)?;
        }
        let id = self.catalog.add(new, at)?;
        self.recompute_occupancy();
        tracing::info!(product_id = %id, "product added");
        Ok(id)
    }

    pub fn update_product(&mut self, id: ProductId, patch: ProductPatch) -> WarehouseResult<&Product> {
        self.catalog.find_by_id(id)?;
        if let Some(code) = &patch.location {
            self.ensure_slot_free(code, Some(id))?;
        }
        let relocates = patch.location.is_some();
        self.catalog.update(id, patch)?;
        if relocates {
            self.recompute_occupancy();
        }
        self.catalog.find_by_id(id)
    }

    /// Move a product to `location`, or take it off the grid with `None`.
    pub fn relocate_product(&mut self, id: ProductId, location: Option<SlotCode>) -> WarehouseResult<()> {
        self.catalog.find_by_id(id)?;
        if let Some(code) = &location {
            self.ensure_slot_free(code, Some(id))?;
        }
        self.catalog.relocate(id, location)?;
        self.recompute_occupancy();
        Ok(())
    }

    /// Remove a product. Refused while the running inventory check or an open
    /// document references it; stock on hand needs `confirmed`.
    pub fn remove_product(&mut self, id: ProductId, confirmed: bool) -> WarehouseResult<Product> {
        if self.checks.is_referenced(id) {
            return Err(WarehouseError::ReferencedByOpenCheck(id));
        }
        if self.ledger.has_open_line_for(id) {
            return Err(WarehouseError::validation(format!(
                "product {id} is on an open document"
            )));
        }
        let product = self.catalog.remove(id, confirmed)?;
        self.recompute_occupancy();
        Ok(product)
    }

    pub fn product(&self, id: ProductId) -> WarehouseResult<&Product> {
        self.catalog.find_by_id(id)
    }

    pub fn product_by_barcode(&self, barcode: &str) -> WarehouseResult<&Product> {
        self.catalog.find_by_barcode(barcode)
    }

    pub fn low_stock(&self) -> Vec<StockAlert> {
        self.catalog.low_stock()
    }

    pub fn overstock(&self) -> Vec<StockAlert> {
        self.catalog.overstock()
    }

    /// Products stored under a code prefix (`"B"`, `"A-1"`, `"A-1-2-01"`).
    pub fn products_at(&self, prefix: &str) -> Vec<&Product> {
        self.grid.find_by_code_prefix(&self.catalog, prefix)
    }

    // ---- receipts -------------------------------------------------------

    pub fn open_receipt(&mut self, header: ReceiptHeader, at: DateTime<Utc>) -> ReceiptId {
        self.ledger.open_receipt(header, at)
    }

    pub fn add_receipt_item(&mut self, id: ReceiptId, line: ReceiptLine) -> WarehouseResult<&ReceiptItem> {
        if let Some(code) = &line.destination {
            self.ensure_slot_free(code, Some(line.product_id))?;
        }
        self.ledger.add_receipt_item(id, &self.catalog, line)
    }

    /// Create a product as part of a receipt; it holds no stock until commit.
    pub fn add_receipt_new_product(
        &mut self,
        id: ReceiptId,
        new: NewProduct,
        quantity: u32,
        at: DateTime<Utc>,
    ) -> WarehouseResult<ProductId> {
        if let Some(code) = &new.location {
            self.ensure_slot_free(code, None)?;
        }
        let product_id = self
            .ledger
            .add_receipt_new_product(id, &mut self.catalog, new, quantity, at)?;
        self.recompute_occupancy();
        Ok(product_id)
    }

    pub fn commit_receipt(&mut self, id: ReceiptId, at: DateTime<Utc>) -> WarehouseResult<&Receipt> {
        self.ledger
            .commit_receipt(id, &mut self.catalog, &mut self.grid, at)
    }

    /// Drop an open receipt. Products it created stay in the catalog, empty.
    pub fn discard_receipt(&mut self, id: ReceiptId) -> WarehouseResult<ReceiptDraft> {
        self.ledger.discard_receipt(id)
    }

    // ---- expenditures ---------------------------------------------------

    pub fn open_expenditure(&mut self, header: ExpenditureHeader, at: DateTime<Utc>) -> ExpenditureId {
        self.ledger.open_expenditure(header, at)
    }

    pub fn add_expenditure_item(
        &mut self,
        id: ExpenditureId,
        line: ExpenditureLine,
    ) -> WarehouseResult<&ExpenditureItem> {
        self.ledger.add_expenditure_item(id, &mut self.catalog, line)
    }

    pub fn commit_expenditure(&mut self, id: ExpenditureId) -> WarehouseResult<&Expenditure> {
        self.ledger.commit_expenditure(id)
    }

    pub fn discard_expenditure(&mut self, id: ExpenditureId) -> WarehouseResult<ExpenditureDraft> {
        self.ledger.discard_expenditure(id, &mut self.catalog)
    }

    // ---- inventory checks -----------------------------------------------

    pub fn start_check(&mut self, inspector: &str, at: DateTime<Utc>) -> WarehouseResult<CheckId> {
        self.checks.start(&self.catalog, inspector, at)
    }

    pub fn current_check(&self) -> Option<&InventoryCheck> {
        self.checks.current()
    }

    pub fn record_counts(&mut self, counts: &[(ProductId, u32)]) -> WarehouseResult<usize> {
        self.checks.record_counts(counts)
    }

    pub fn pending_counts(&self) -> WarehouseResult<Vec<&CountLine>> {
        self.checks.pending()
    }

    pub fn complete_check(&mut self, apply_corrections: bool, notes: &str) -> WarehouseResult<CheckSummary> {
        let summary = self
            .checks
            .complete(&mut self.catalog, apply_corrections, notes)?;
        if summary.corrections_applied > 0 {
            self.recompute_occupancy();
        }
        Ok(summary)
    }

    pub fn check_history(&self) -> Vec<&InventoryCheck> {
        self.checks.history()
    }

    // ---- slots ----------------------------------------------------------

    pub fn recompute_occupancy(&mut self) -> OccupancyReport {
        self.grid.recompute_occupancy(&self.catalog)
    }

    /// Give each category its own zone; returns the number of products moved.
    /// Slots claimed by open receipts are left alone.
    pub fn optimize_by_category(&mut self) -> WarehouseResult<usize> {
        let reserved = self.reserved_slots();
        let plan = plan_by_category(
            &self.catalog,
            &self.grid,
            &self.config.optimizer.zone_pool,
            &reserved,
        );
        self.apply_plan(&plan, "by-category")
    }

    /// Repack every product densely in grid order, skipping slots claimed by
    /// open receipts; returns the number moved.
    pub fn optimize_automatic(&mut self) -> WarehouseResult<usize> {
        let reserved = self.reserved_slots();
        let plan = plan_automatic(&self.catalog, &self.grid, &reserved);
        self.apply_plan(&plan, "automatic")
    }

    fn reserved_slots(&self) -> Vec<SlotCode> {
        let mut reserved: Vec<SlotCode> = self
            .ledger
            .pending_destinations()
            .map(|(_, code)| code)
            .collect();
        reserved.sort_unstable();
        reserved.dedup();
        reserved
    }

    fn apply_plan(&mut self, plan: &RelocationPlan, strategy: &'static str) -> WarehouseResult<usize> {
        for relocation in &plan.moves {
            self.catalog.relocate(relocation.product_id, Some(relocation.to))?;
        }
        let report = self.recompute_occupancy();
        tracing::info!(
            strategy,
            relocated = plan.len(),
            unplaced = plan.unplaced.len(),
            collisions = report.collisions.len(),
            "slot optimization applied"
        );
        Ok(plan.len())
    }

    fn ensure_slot_free(&self, code: &SlotCode, claimant: Option<ProductId>) -> WarehouseResult<()> {
        self.grid.slot(code)?;
        let pending = self
            .ledger
            .pending_destinations()
            .filter(|(_, claimed)| claimed == code)
            .map(|(product_id, _)| product_id);
        match self
            .grid
            .occupant(code)
            .into_iter()
            .chain(pending)
            .find(|holder| Some(*holder) != claimant)
        {
            Some(product_id) => Err(WarehouseError::SlotTaken {
                code: *code,
                product_id,
            }),
            None => Ok(()),
        }
    }

    // ---- reports --------------------------------------------------------

    pub fn inventory_summary(&self) -> InventorySummary {
        inventory_summary(&self.catalog, self.config.analytics.top_n)
    }

    pub fn abc_analysis(&self) -> AbcAnalysis {
        classify(&self.catalog, &self.config.analytics)
    }

    pub fn occupancy(&self) -> OccupancyStats {
        occupancy_stats(&self.grid)
    }

    pub fn movement_report(&self, now: DateTime<Utc>) -> MovementReport {
        movement_report(&self.ledger, now)
    }

    pub fn supplier_report(&self) -> SupplierReport {
        supplier_report(&self.ledger, &self.catalog)
    }

    pub fn financial_report(&self, now: DateTime<Utc>) -> FinancialReport {
        financial_report(&self.catalog, &self.ledger, self.config.analytics.estimated_margin, now)
    }

    pub fn efficiency_report(&self) -> EfficiencyReport {
        efficiency_report(&self.catalog, &self.grid, &self.checks, &self.config.analytics)
    }
}
