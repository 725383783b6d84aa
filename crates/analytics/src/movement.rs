//! Document rollups: movement, suppliers, finances.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockyard_catalog::{Catalog, Product};
use stockyard_documents::{Expenditure, ExpenditurePurpose, Ledger, Receipt};
use stockyard_core::ProductId;

use crate::valuation::{ProductValue, stock_value};

/// Reporting windows, each counted back from the start of the current day.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Period {
    Week,
    Month,
    Quarter,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Week, Period::Month, Period::Quarter];

    pub fn days(self) -> i64 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
            Period::Quarter => 90,
        }
    }

    /// First instant inside the window ending at `now`.
    pub fn since(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.date_naive().and_time(NaiveTime::MIN).and_utc() - Duration::days(self.days())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTotals {
    pub count: usize,
    pub amount: Decimal,
}

impl DocumentTotals {
    fn add(&mut self, amount: Decimal) {
        self.count += 1;
        self.amount += amount;
    }

    pub fn average(&self) -> Option<Decimal> {
        (self.count > 0).then(|| self.amount / Decimal::from(self.count))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierActivity {
    pub supplier: String,
    pub deliveries: usize,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurposeTotals {
    pub purpose: ExpenditurePurpose,
    pub count: usize,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementReport {
    pub receipts_week: DocumentTotals,
    pub receipts_month: DocumentTotals,
    pub expenditures_week: DocumentTotals,
    pub expenditures_month: DocumentTotals,
    /// Up to five suppliers by received amount over the month.
    pub top_suppliers: Vec<SupplierActivity>,
    /// Month's expenditures by purpose; purposes without documents are omitted.
    pub by_purpose: Vec<PurposeTotals>,
    /// Month's received amount over issued amount; needs documents of both kinds.
    pub receipt_to_expenditure: Option<Decimal>,
    pub average_receipt: Option<Decimal>,
    pub average_expenditure: Option<Decimal>,
}

const TOP_SUPPLIERS: usize = 5;

pub fn movement_report(ledger: &Ledger, now: DateTime<Utc>) -> MovementReport {
    let week = Period::Week.since(now);
    let month = Period::Month.since(now);

    let receipts: Vec<&Receipt> = ledger.receipts().into_iter().filter(|r| r.received_at >= month).collect();
    let expenditures: Vec<&Expenditure> = ledger
        .expenditures()
        .into_iter()
        .filter(|e| e.issued_at >= month)
        .collect();

    let mut report = MovementReport {
        receipts_week: DocumentTotals::default(),
        receipts_month: DocumentTotals::default(),
        expenditures_week: DocumentTotals::default(),
        expenditures_month: DocumentTotals::default(),
        top_suppliers: Vec::new(),
        by_purpose: Vec::new(),
        receipt_to_expenditure: None,
        average_receipt: None,
        average_expenditure: None,
    };

    for receipt in &receipts {
        report.receipts_month.add(receipt.total_amount);
        if receipt.received_at >= week {
            report.receipts_week.add(receipt.total_amount);
        }
    }
    for expenditure in &expenditures {
        report.expenditures_month.add(expenditure.total_amount);
        if expenditure.issued_at >= week {
            report.expenditures_week.add(expenditure.total_amount);
        }
    }

    report.top_suppliers = supplier_activity(&receipts);
    report.top_suppliers.truncate(TOP_SUPPLIERS);

    let mut by_purpose: BTreeMap<ExpenditurePurpose, DocumentTotals> = BTreeMap::new();
    for expenditure in &expenditures {
        by_purpose.entry(expenditure.purpose).or_default().add(expenditure.total_amount);
    }
    report.by_purpose = by_purpose
        .into_iter()
        .map(|(purpose, totals)| PurposeTotals {
            purpose,
            count: totals.count,
            amount: totals.amount,
        })
        .collect();

    if report.receipts_month.count > 0 && report.expenditures_month.count > 0 {
        report.receipt_to_expenditure = ratio(report.receipts_month.amount, report.expenditures_month.amount);
    }
    report.average_receipt = report.receipts_month.average();
    report.average_expenditure = report.expenditures_month.average();
    report
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierSummary {
    pub supplier: String,
    pub deliveries: usize,
    pub total_amount: Decimal,
    pub distinct_products: usize,
    pub last_delivery: DateTime<Utc>,
    /// Share of all received value, in percent.
    pub share: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierStock {
    pub supplier: String,
    pub stock_value: Decimal,
    /// The supplier's three most valuable positions.
    pub top_products: Vec<ProductValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierReport {
    /// Every supplier with at least one receipt, by received amount descending.
    pub suppliers: Vec<SupplierSummary>,
    /// Up to five suppliers by value of stock currently on hand.
    pub stock_by_supplier: Vec<SupplierStock>,
}

const TOP_STOCK_SUPPLIERS: usize = 5;
const TOP_SUPPLIER_PRODUCTS: usize = 3;

pub fn supplier_report(ledger: &Ledger, catalog: &Catalog) -> SupplierReport {
    struct Acc {
        deliveries: usize,
        amount: Decimal,
        products: BTreeSet<ProductId>,
        last: DateTime<Utc>,
    }

    let mut by_supplier: BTreeMap<&str, Acc> = BTreeMap::new();
    for receipt in ledger.receipts() {
        let acc = by_supplier.entry(receipt.supplier.as_str()).or_insert_with(|| Acc {
            deliveries: 0,
            amount: Decimal::ZERO,
            products: BTreeSet::new(),
            last: receipt.received_at,
        });
        acc.deliveries += 1;
        acc.amount += receipt.total_amount;
        acc.products.extend(receipt.items.iter().map(|i| i.product_id));
        acc.last = acc.last.max(receipt.received_at);
    }

    let received = ledger.total_received();
    let mut suppliers: Vec<SupplierSummary> = by_supplier
        .into_iter()
        .map(|(supplier, acc)| SupplierSummary {
            supplier: supplier.to_string(),
            deliveries: acc.deliveries,
            total_amount: acc.amount,
            distinct_products: acc.products.len(),
            last_delivery: acc.last,
            share: crate::percent(acc.amount, received),
        })
        .collect();
    suppliers.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));

    let mut stock: BTreeMap<&str, Vec<&Product>> = BTreeMap::new();
    for product in catalog.iter().filter(|p| !p.supplier().is_empty()) {
        stock.entry(product.supplier()).or_default().push(product);
    }
    let mut stock_by_supplier: Vec<SupplierStock> = stock
        .into_iter()
        .map(|(supplier, mut products)| {
            products.sort_by(|a, b| b.stock_value().cmp(&a.stock_value()));
            SupplierStock {
                supplier: supplier.to_string(),
                stock_value: products.iter().map(|p| p.stock_value()).sum(),
                top_products: products
                    .into_iter()
                    .take(TOP_SUPPLIER_PRODUCTS)
                    .map(ProductValue::from)
                    .collect(),
            }
        })
        .collect();
    stock_by_supplier.sort_by(|a, b| b.stock_value.cmp(&a.stock_value));
    stock_by_supplier.truncate(TOP_STOCK_SUPPLIERS);

    SupplierReport {
        suppliers,
        stock_by_supplier,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub period: Period,
    pub since: DateTime<Utc>,
    pub received: Decimal,
    pub issued: Decimal,
    pub ratio: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesEstimate {
    pub total_sales: Decimal,
    pub estimated_profit: Decimal,
    /// Profit over sales, in percent.
    pub profitability: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialReport {
    pub stock_value: Decimal,
    pub total_received: Decimal,
    pub total_issued: Decimal,
    /// Received over issued; `None` while nothing was issued.
    pub turnover_ratio: Option<Decimal>,
    pub periods: Vec<PeriodTotals>,
    /// Present once at least one sale was booked.
    pub sales: Option<SalesEstimate>,
}

pub fn financial_report(
    catalog: &Catalog,
    ledger: &Ledger,
    margin: Decimal,
    now: DateTime<Utc>,
) -> FinancialReport {
    let total_received = ledger.total_received();
    let total_issued = ledger.total_issued();

    let periods = Period::ALL
        .iter()
        .map(|&period| {
            let since = period.since(now);
            let received: Decimal = ledger
                .receipts()
                .iter()
                .filter(|r| r.received_at >= since)
                .map(|r| r.total_amount)
                .sum();
            let issued: Decimal = ledger
                .expenditures()
                .iter()
                .filter(|e| e.issued_at >= since)
                .map(|e| e.total_amount)
                .sum();
            PeriodTotals {
                period,
                since,
                received,
                issued,
                ratio: ratio(received, issued),
            }
        })
        .collect();

    let sales: Vec<&Expenditure> = ledger
        .expenditures()
        .into_iter()
        .filter(|e| e.purpose == ExpenditurePurpose::Sale)
        .collect();
    let sales = (!sales.is_empty()).then(|| {
        let total_sales: Decimal = sales.iter().map(|e| e.total_amount).sum();
        let estimated_profit = total_sales * margin;
        SalesEstimate {
            total_sales,
            estimated_profit,
            profitability: crate::percent(estimated_profit, total_sales),
        }
    });

    FinancialReport {
        stock_value: stock_value(catalog),
        total_received,
        total_issued,
        turnover_ratio: ratio(total_received, total_issued),
        periods,
        sales,
    }
}

fn supplier_activity(receipts: &[&Receipt]) -> Vec<SupplierActivity> {
    let mut totals: BTreeMap<&str, DocumentTotals> = BTreeMap::new();
    for receipt in receipts {
        totals.entry(receipt.supplier.as_str()).or_default().add(receipt.total_amount);
    }
    let mut activity: Vec<SupplierActivity> = totals
        .into_iter()
        .map(|(supplier, t)| SupplierActivity {
            supplier: supplier.to_string(),
            deliveries: t.count,
            amount: t.amount,
        })
        .collect();
    activity.sort_by(|a, b| b.amount.cmp(&a.amount));
    activity
}

fn ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        None
    } else {
        Some((numerator / denominator).round_dp(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::fixtures::{expenditure, ledger_catalog, receipt};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 31, 15, 30, 0).unwrap()
    }

    #[test]
    fn windows_start_at_midnight() {
        let since = Period::Week.since(now());
        assert_eq!(since, Utc.with_ymd_and_hms(2024, 3, 24, 0, 0, 0).unwrap());
        assert_eq!(
            Period::Quarter.since(now()),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn movement_splits_week_and_month() {
        let (mut ledger, mut catalog, mut grid, ids) = ledger_catalog();
        receipt(&mut ledger, &mut catalog, &mut grid, "North", ids[0], 10, now() - Duration::days(2));
        receipt(&mut ledger, &mut catalog, &mut grid, "South", ids[0], 1, now() - Duration::days(20));
        receipt(&mut ledger, &mut catalog, &mut grid, "North", ids[0], 5, now() - Duration::days(60));
        expenditure(&mut ledger, &mut catalog, ids[0], 2, ExpenditurePurpose::Sale, now() - Duration::days(1));
        expenditure(&mut ledger, &mut catalog, ids[0], 3, ExpenditurePurpose::WriteOff, now() - Duration::days(10));

        let report = movement_report(&ledger, now());
        // Unit price of ids[0] is 2.
        assert_eq!(report.receipts_week, DocumentTotals { count: 1, amount: Decimal::from(20) });
        assert_eq!(report.receipts_month, DocumentTotals { count: 2, amount: Decimal::from(22) });
        assert_eq!(report.expenditures_week.count, 1);
        assert_eq!(report.expenditures_month.amount, Decimal::from(10));

        assert_eq!(report.top_suppliers[0].supplier, "North");
        assert_eq!(report.top_suppliers[0].deliveries, 1);
        let purposes: Vec<ExpenditurePurpose> = report.by_purpose.iter().map(|p| p.purpose).collect();
        assert_eq!(purposes, vec![ExpenditurePurpose::Sale, ExpenditurePurpose::WriteOff]);
        assert_eq!(report.receipt_to_expenditure, Some(Decimal::new(220, 2)));
        assert_eq!(report.average_receipt, Some(Decimal::from(11)));
    }

    #[test]
    fn supplier_report_ranks_by_amount() {
        let (mut ledger, mut catalog, mut grid, ids) = ledger_catalog();
        receipt(&mut ledger, &mut catalog, &mut grid, "Small", ids[0], 1, now());
        receipt(&mut ledger, &mut catalog, &mut grid, "Big", ids[0], 5, now() - Duration::days(3));
        receipt(&mut ledger, &mut catalog, &mut grid, "Big", ids[1], 5, now());

        let report = supplier_report(&ledger, &catalog);
        assert_eq!(report.suppliers.len(), 2);
        let big = &report.suppliers[0];
        assert_eq!(big.supplier, "Big");
        assert_eq!(big.deliveries, 2);
        assert_eq!(big.distinct_products, 2);
        assert_eq!(big.last_delivery, now());
        assert!(report.stock_by_supplier.iter().all(|s| s.top_products.len() <= 3));
    }

    #[test]
    fn financial_report_estimates_profit_on_sales_only() {
        let (mut ledger, mut catalog, mut grid, ids) = ledger_catalog();
        receipt(&mut ledger, &mut catalog, &mut grid, "North", ids[0], 50, now() - Duration::days(40));
        expenditure(&mut ledger, &mut catalog, ids[0], 10, ExpenditurePurpose::Sale, now());
        expenditure(&mut ledger, &mut catalog, ids[0], 5, ExpenditurePurpose::InternalUse, now());

        let report = financial_report(&catalog, &ledger, Decimal::new(30, 2), now());
        assert_eq!(report.total_received, Decimal::from(100));
        assert_eq!(report.total_issued, Decimal::from(30));
        assert_eq!(report.turnover_ratio, Some(Decimal::new(333, 2)));

        let week = &report.periods[0];
        assert_eq!(week.received, Decimal::ZERO);
        assert_eq!(week.issued, Decimal::from(30));
        assert_eq!(report.periods[2].received, Decimal::from(100));

        let sales = report.sales.unwrap();
        assert_eq!(sales.total_sales, Decimal::from(20));
        assert_eq!(sales.estimated_profit, Decimal::from(6));
        assert_eq!(sales.profitability, Decimal::from(30));
    }

    #[test]
    fn no_sales_means_no_estimate() {
        let (ledger, catalog, _, _) = ledger_catalog();
        let report = financial_report(&catalog, &ledger, Decimal::new(30, 2), now());
        assert!(report.sales.is_none());
        assert_eq!(report.turnover_ratio, None);
    }
}
