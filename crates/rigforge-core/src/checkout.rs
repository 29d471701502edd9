//! Hand-off from a finished build to the order collaborator.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;

use crate::build::Build;
use crate::part::Category;

/// Flat assembly charge, added once per order.
pub const ASSEMBLY_FEE: Decimal = dec!(500);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Please select at least one component")]
    EmptyBuild,
    #[error("{name} (#{id}) is out of stock")]
    OutOfStock { id: u64, name: String },
    #[error("Missing customer {0}")]
    IncompleteCustomer(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    pub id: u64,
    pub name: String,
    pub category: Category,
    pub price: Decimal,
    #[serde(skip)]
    pub quantity: i64,
}

/// Priced order lines for a build, in slot order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDraft {
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub assembly_fee: Decimal,
    pub total: Decimal,
}

impl OrderDraft {
    pub fn from_build(build: &Build) -> Result<Self, CheckoutError> {
        if build.is_empty() {
            return Err(CheckoutError::EmptyBuild);
        }
        let items: Vec<OrderItem> = build
            .parts()
            .map(|p| OrderItem {
                id: p.id,
                name: p.name.clone(),
                category: p.category,
                price: p.price,
                quantity: p.quantity,
            })
            .collect();
        let subtotal = build.total_price();
        Ok(Self {
            items,
            subtotal,
            assembly_fee: ASSEMBLY_FEE,
            total: subtotal.saturating_add(ASSEMBLY_FEE),
        })
    }

    /// Each line takes one unit, so every part needs at least one in stock.
    pub fn check_stock(&self) -> Result<(), CheckoutError> {
        match self.items.iter().find(|item| item.quantity < 1) {
            Some(item) => Err(CheckoutError::OutOfStock {
                id: item.id,
                name: item.name.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Customer {
    pub name: String,
    pub tax_id: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    pub id: u64,
    pub price: Decimal,
}

/// Body of the order submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRequest {
    pub customer_name: String,
    pub customer_tax_id: String,
    pub customer_address: String,
    pub items: Vec<OrderLine>,
    pub total: Decimal,
}

impl OrderRequest {
    pub fn new(draft: &OrderDraft, customer: Customer) -> Result<Self, CheckoutError> {
        if customer.name.trim().is_empty() {
            return Err(CheckoutError::IncompleteCustomer("name"));
        }
        if customer.address.trim().is_empty() {
            return Err(CheckoutError::IncompleteCustomer("address"));
        }
        Ok(Self {
            customer_name: customer.name.trim().to_string(),
            customer_tax_id: customer.tax_id.trim().to_string(),
            customer_address: customer.address.trim().to_string(),
            items: draft
                .items
                .iter()
                .map(|item| OrderLine {
                    id: item.id,
                    price: item.price,
                })
                .collect(),
            total: draft.total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::{Part, RawPart};
    use serde_json::json;

    fn part(id: u64, category: &str, price: &str, quantity: i64) -> Part {
        let raw: RawPart = serde_json::from_value(json!({
            "id": id, "name": format!("part {id}"), "category": category,
            "price": price, "quantity": quantity
        }))
        .unwrap();
        Part::from_raw(raw).unwrap()
    }

    fn customer() -> Customer {
        Customer {
            name: "Somchai".into(),
            tax_id: String::new(),
            address: " 99 Rama IV Rd, Bangkok ".into(),
        }
    }

    #[test]
    fn empty_build_is_rejected() {
        assert_eq!(
            OrderDraft::from_build(&Build::new()),
            Err(CheckoutError::EmptyBuild)
        );
    }

    #[test]
    fn fee_is_added_once() {
        let build: Build = [part(2, "RAM", "3290.00", 4), part(1, "CPU", "7990.00", 2)]
            .into_iter()
            .collect();
        let draft = OrderDraft::from_build(&build).unwrap();

        assert_eq!(draft.items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(draft.subtotal, dec!(11280.00));
        assert_eq!(draft.assembly_fee, dec!(500));
        assert_eq!(draft.total, dec!(11780.00));
        assert!(draft.check_stock().is_ok());
    }

    #[test]
    fn sold_out_part_fails_stock_check() {
        let build: Build = [part(1, "CPU", "7990", 2), part(3, "GPU", "21900", 0)]
            .into_iter()
            .collect();
        let draft = OrderDraft::from_build(&build).unwrap();
        assert_eq!(
            draft.check_stock(),
            Err(CheckoutError::OutOfStock {
                id: 3,
                name: "part 3".into()
            })
        );
    }

    #[test]
    fn request_requires_name_and_address() {
        let build: Build = [part(1, "CPU", "7990", 2)].into_iter().collect();
        let draft = OrderDraft::from_build(&build).unwrap();

        let nameless = Customer {
            name: "  ".into(),
            ..customer()
        };
        assert_eq!(
            OrderRequest::new(&draft, nameless),
            Err(CheckoutError::IncompleteCustomer("name"))
        );
        let homeless = Customer {
            address: String::new(),
            ..customer()
        };
        assert_eq!(
            OrderRequest::new(&draft, homeless),
            Err(CheckoutError::IncompleteCustomer("address"))
        );
    }

    #[test]
    fn request_body() {
        let build: Build = [part(1, "CPU", "7990.00", 2), part(2, "RAM", "3290.00", 4)]
            .into_iter()
            .collect();
        let draft = OrderDraft::from_build(&build).unwrap();
        let request = OrderRequest::new(&draft, customer()).unwrap();

        insta::assert_json_snapshot!(request, @r#"
        {
          "customer_name": "Somchai",
          "customer_tax_id": "",
          "customer_address": "99 Rama IV Rd, Bangkok",
          "items": [
            {
              "id": 1,
              "price": "7990.00"
            },
            {
              "id": 2,
              "price": "3290.00"
            }
          ],
          "total": "11780.00"
        }
        "#);
    }
}
