// src/metrics.rs

use std::collections::HashMap;

use tracing::{info, warn};

use crate::data_loader::RawDocument;
use crate::error::{AppError, Result};
use crate::parser::parse;
use crate::sorter::parse_float;

pub const PRODUCT_COLUMN: &str = "Product";
pub const SALES_COLUMN: &str = "Total Sales (£)";
pub const CUSTOMER_COLUMN: &str = "Customer ID";

/// Running totals in first-seen order.
#[derive(Debug, Default)]
pub struct MetricAccumulator {
    product_sales: Vec<(String, f64)>,
    product_index: HashMap<String, usize>,
    customer_purchases: Vec<(String, u64)>,
    customer_index: HashMap<String, usize>,
}

impl MetricAccumulator {
    pub fn add_sale(&mut self, product: &str, amount: f64) {
        match self.product_index.get(product) {
            Some(&i) => self.product_sales[i].1 += amount,
            None => {
                self.product_index
                    .insert(product.to_string(), self.product_sales.len());
                self.product_sales.push((product.to_string(), amount));
            }
        }
    }

    pub fn add_purchase(&mut self, customer: &str) {
        match self.customer_index.get(customer) {
            Some(&i) => self.customer_purchases[i].1 += 1,
            None => {
                self.customer_index
                    .insert(customer.to_string(), self.customer_purchases.len());
                self.customer_purchases.push((customer.to_string(), 1));
            }
        }
    }

    pub fn top_product(&self) -> Option<(&str, f64)> {
        first_max(&self.product_sales)
    }

    pub fn top_customer(&self) -> Option<(&str, u64)> {
        first_max(&self.customer_purchases)
    }
}

// Strict comparison: an equal later entry never displaces the earlier one.
fn first_max<T: PartialOrd + Copy>(entries: &[(String, T)]) -> Option<(&str, T)> {
    let mut best: Option<(&str, T)> = None;
    for (key, value) in entries {
        let better = match best {
            Some((_, top)) => *value > top,
            None => true,
        };
        if better {
            best = Some((key.as_str(), *value));
        }
    }
    best
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    pub top_product: Option<(String, f64)>,
    pub top_customer: Option<(String, u64)>,
}

impl MetricsSummary {
    pub fn product_sentence(&self) -> String {
        match &self.top_product {
            Some((product, total)) => {
                format!("Product with highest sales: {} ({})", product, total)
            }
            None => "Product with highest sales: none".to_string(),
        }
    }

    pub fn customer_sentence(&self) -> String {
        match &self.top_customer {
            Some((customer, count)) => {
                format!("Customer with highest purchases: {} ({})", customer, count)
            }
            None => "Customer with highest purchases: none".to_string(),
        }
    }
}

/// Re-parses the raw document and summarises it. Independent of any sorting
/// applied to the displayed table.
pub fn calculate(doc: &RawDocument) -> Result<MetricsSummary> {
    let parsed = parse(doc)?;
    let headers = &parsed.headers;

    let product = headers.column_of(PRODUCT_COLUMN);
    let sales = headers.column_of(SALES_COLUMN);
    let customer = headers.column_of(CUSTOMER_COLUMN);

    let (Some(product), Some(sales), Some(customer)) = (product, sales, customer) else {
        let missing: Vec<&'static str> = [PRODUCT_COLUMN, SALES_COLUMN, CUSTOMER_COLUMN]
            .into_iter()
            .filter(|name| headers.column_of(name).is_none())
            .collect();
        warn!(?missing, "metric columns not found");
        return Err(AppError::MissingMetricColumns { missing });
    };

    let mut acc = MetricAccumulator::default();
    for (i, row) in parsed.rows.iter().enumerate() {
        let (Some(name), Some(buyer)) = (row.get(product), row.get(customer)) else {
            warn!(row = i, cells = row.len(), "row too short for metrics");
            continue;
        };
        if let Some(amount) = row.get(sales).and_then(|s| parse_float(s)) {
            acc.add_sale(name, amount);
        }
        acc.add_purchase(buyer);
    }

    let summary = MetricsSummary {
        top_product: acc.top_product().map(|(p, t)| (p.to_string(), t)),
        top_customer: acc.top_customer().map(|(c, n)| (c.to_string(), n)),
    };
    info!(
        product = ?summary.top_product,
        customer = ?summary.top_customer,
        "metrics calculated"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summarise(text: &str) -> Result<MetricsSummary> {
        calculate(&RawDocument::new("sales.csv", text))
    }

    #[test]
    fn test_top_product_and_customer() {
        let summary =
            summarise("Product,Total Sales (£),Customer ID\nX,10,C1\nY,20,C1\nX,5,C2").unwrap();
        assert_eq!(summary.top_product, Some(("Y".to_string(), 20.0)));
        assert_eq!(summary.top_customer, Some(("C1".to_string(), 2)));
        assert_eq!(
            summary.customer_sentence(),
            "Customer with highest purchases: C1 (2)"
        );
    }

    #[test]
    fn test_sales_are_summed_per_product() {
        let summary =
            summarise("Product,Total Sales (£),Customer ID\nX,10,C1\nY,12,C1\nX,5,C2").unwrap();
        assert_eq!(summary.top_product, Some(("X".to_string(), 15.0)));
        assert_eq!(
            summary.product_sentence(),
            "Product with highest sales: X (15)"
        );
    }

    #[test]
    fn test_missing_customer_column() {
        let err = summarise("Product,Total Sales (£)\nX,10\n").unwrap_err();
        match err {
            AppError::MissingMetricColumns { missing } => {
                assert_eq!(missing, vec![CUSTOMER_COLUMN]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_sales_still_counts_purchase() {
        let summary = summarise(
            "Customer ID,Product,Total Sales (£)\nC2,A,n/a\nC2,B,n/a\nC1,A,3\n",
        )
        .unwrap();
        assert_eq!(summary.top_product, Some(("A".to_string(), 3.0)));
        assert_eq!(summary.top_customer, Some(("C2".to_string(), 2)));
    }

    #[test]
    fn test_sales_read_leading_number() {
        let summary = summarise(
            "Product,Total Sales (£),Customer ID\nA,12kg,C1\nA,3.5%,C1\nB,inf,C2\nB,1e400,C2\n",
        )
        .unwrap();
        assert_eq!(summary.top_product, Some(("A".to_string(), 15.5)));
        assert_eq!(summary.top_customer, Some(("C1".to_string(), 2)));
    }

    #[test]
    fn test_ties_keep_first_seen() {
        let summary =
            summarise("Product,Total Sales (£),Customer ID\nA,5,C9\nB,5,C1\n").unwrap();
        assert_eq!(summary.top_product, Some(("A".to_string(), 5.0)));
        assert_eq!(summary.top_customer, Some(("C9".to_string(), 1)));
    }

    #[test]
    fn test_no_valid_sales() {
        let summary = summarise("Product,Total Sales (£),Customer ID\nA,-,C1\n").unwrap();
        assert_eq!(summary.top_product, None);
        assert_eq!(summary.product_sentence(), "Product with highest sales: none");
    }

    #[test]
    fn test_short_rows_skipped() {
        let summary =
            summarise("Product,Total Sales (£),Customer ID\nA,4\nB,2,C1\n").unwrap();
        assert_eq!(summary.top_product, Some(("B".to_string(), 2.0)));
        assert_eq!(summary.top_customer, Some(("C1".to_string(), 1)));
    }

    #[test]
    fn test_quoted_headers_match() {
        let summary =
            summarise("\"Product\",\"Total Sales (£)\",\"Customer ID\"\n\"P\",\"7.5\",\"C\"\n")
                .unwrap();
        assert_eq!(summary.top_product, Some(("P".to_string(), 7.5)));
    }
}
