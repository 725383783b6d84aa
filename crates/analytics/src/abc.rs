//! ABC valuation of stock.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockyard_catalog::{Catalog, Product};
use stockyard_core::{AnalyticsConfig, ProductId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

impl AbcClass {
    pub const ALL: [AbcClass; 3] = [AbcClass::A, AbcClass::B, AbcClass::C];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbcEntry {
    pub product_id: ProductId,
    pub name: String,
    pub value: Decimal,
    /// Running share of total value after adding this product, in percent.
    pub cumulative_percent: Decimal,
    pub class: AbcClass,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbcClassSummary {
    pub class: AbcClass,
    pub count: usize,
    pub value: Decimal,
    /// Share of total value, in percent (rounded to 2 places).
    pub share: Decimal,
}

/// Products ranked by stock value, descending, each with its class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbcAnalysis {
    pub total_value: Decimal,
    pub entries: Vec<AbcEntry>,
}

impl AbcAnalysis {
    pub fn class_of(&self, product_id: ProductId) -> Option<AbcClass> {
        self.entries
            .iter()
            .find(|e| e.product_id == product_id)
            .map(|e| e.class)
    }

    /// Count and value per class, always A, B, C in that order.
    pub fn summary(&self) -> Vec<AbcClassSummary> {
        AbcClass::ALL
            .iter()
            .map(|&class| {
                let members = self.entries.iter().filter(|e| e.class == class);
                let (count, value) = members.fold((0, Decimal::ZERO), |(n, v), e| (n + 1, v + e.value));
                AbcClassSummary {
                    class,
                    count,
                    value,
                    share: crate::percent(value, self.total_value),
                }
            })
            .collect()
    }
}

/// Classify every product by its cumulative share of stock value.
///
/// Products are taken in descending value order (ties keep catalog order).
/// After adding a product's value, a running share within `abc_a_threshold`
/// puts it in A, within `abc_b_threshold` in B, otherwise C. With no stock
/// value at all every product is C.
pub fn classify(catalog: &Catalog, config: &AnalyticsConfig) -> AbcAnalysis {
    let mut products: Vec<&Product> = catalog.iter().collect();
    products.sort_by(|a, b| b.stock_value().cmp(&a.stock_value()));

    let total_value: Decimal = products.iter().map(|p| p.stock_value()).sum();
    let mut cumulative = Decimal::ZERO;
    let entries = products
        .into_iter()
        .map(|product| {
            let value = product.stock_value();
            cumulative += value;
            let (cumulative_percent, class) = if total_value.is_zero() {
                (Decimal::ZERO, AbcClass::C)
            } else {
                let percent = cumulative * Decimal::ONE_HUNDRED / total_value;
                let class = if percent <= config.abc_a_threshold {
                    AbcClass::A
                } else if percent <= config.abc_b_threshold {
                    AbcClass::B
                } else {
                    AbcClass::C
                };
                (percent, class)
            };
            AbcEntry {
                product_id: product.product_id(),
                name: product.name().to_string(),
                value,
                cumulative_percent,
                class,
            }
        })
        .collect();

    AbcAnalysis { total_value, entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::catalog_priced;

    #[test]
    fn boundary_product_joins_the_class_its_running_share_satisfies() {
        // Values 80, 15, 5: running shares 80%, 95%, 100%.
        let (catalog, ids) = catalog_priced(&[(5, 1), (80, 1), (15, 1)]);
        let analysis = classify(&catalog, &AnalyticsConfig::default());

        assert_eq!(analysis.total_value, Decimal::from(100));
        assert_eq!(analysis.class_of(ids[1]), Some(AbcClass::A));
        assert_eq!(analysis.class_of(ids[2]), Some(AbcClass::B));
        assert_eq!(analysis.class_of(ids[0]), Some(AbcClass::C));
        let order: Vec<ProductId> = analysis.entries.iter().map(|e| e.product_id).collect();
        assert_eq!(order, vec![ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn dominant_product_alone_can_fall_outside_a() {
        // A single product holding 90% of value crosses the A threshold itself.
        let (catalog, ids) = catalog_priced(&[(90, 1), (10, 1)]);
        let analysis = classify(&catalog, &AnalyticsConfig::default());
        assert_eq!(analysis.class_of(ids[0]), Some(AbcClass::B));
        assert_eq!(analysis.class_of(ids[1]), Some(AbcClass::C));
    }

    #[test]
    fn no_value_means_everything_is_c() {
        let (catalog, _) = catalog_priced(&[(0, 3), (4, 0)]);
        let analysis = classify(&catalog, &AnalyticsConfig::default());
        assert!(analysis.entries.iter().all(|e| e.class == AbcClass::C));

        let summary = analysis.summary();
        assert_eq!(summary[2].count, 2);
        assert_eq!(summary[2].share, Decimal::ZERO);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 128,
                ..ProptestConfig::default()
            })]

            /// Property: every product lands in exactly one class and the
            /// class values add up to the total.
            #[test]
            fn classes_partition_the_catalog(
                rows in prop::collection::vec((0i64..10_000, 0u32..500), 0..40)
            ) {
                let (catalog, _) = catalog_priced(&rows);
                let analysis = classify(&catalog, &AnalyticsConfig::default());

                prop_assert_eq!(analysis.entries.len(), catalog.len());
                let summary = analysis.summary();
                let count: usize = summary.iter().map(|s| s.count).sum();
                let value: Decimal = summary.iter().map(|s| s.value).sum();
                prop_assert_eq!(count, catalog.len());
                prop_assert_eq!(value, analysis.total_value);

                // Classes never go back up as value decreases.
                let classes: Vec<AbcClass> = analysis.entries.iter().map(|e| e.class).collect();
                prop_assert!(classes.windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }
}
