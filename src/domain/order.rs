use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient::or_default;
use super::{Price, Product, ProductId};

/// Procurement-stage status assigned by reviewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcurementStatus {
    #[default]
    Pending,
    Reviewed,
    Approved,
    Declined,
    #[serde(other)]
    Other,
}

/// Terminal disposition of an order. Takes precedence over [`ProcurementStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinalStatus {
    Pending,
    Approved,
    Rejected,
    Dispatch,
    #[serde(other)]
    Other,
}

/// What the user sees for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayStatus {
    Pending,
    Reviewed,
    Approved,
    Declined,
}

impl DisplayStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DisplayStatus::Pending => "Pending",
            DisplayStatus::Reviewed => "Reviewed",
            DisplayStatus::Approved => "Approved",
            DisplayStatus::Declined => "Declined",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            DisplayStatus::Pending => "orange",
            DisplayStatus::Reviewed => "blue",
            DisplayStatus::Approved => "green",
            DisplayStatus::Declined => "red",
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub username: String,
}

/// Product entry inside an order. Backends return either a full product
/// object or just its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderProduct {
    Id(ProductId),
    Full(Product),
}

impl OrderProduct {
    pub fn id(&self) -> Option<ProductId> {
        match self {
            OrderProduct::Id(id) => Some(*id),
            OrderProduct::Full(product) => product.id,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            OrderProduct::Id(_) => None,
            OrderProduct::Full(product) => product.title.as_deref(),
        }
    }
}

/// A submitted order as read back from the backend. Never mutated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    #[serde(default, deserialize_with = "or_default")]
    pub user: Option<UserRef>,
    #[serde(default, deserialize_with = "or_default")]
    pub products: Vec<OrderProduct>,
    #[serde(default, deserialize_with = "or_default")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "or_default")]
    pub total_price: Option<Price>,
    #[serde(default, deserialize_with = "or_default")]
    pub status: ProcurementStatus,
    #[serde(default, deserialize_with = "or_default")]
    pub final_status: Option<FinalStatus>,
}

impl Order {
    /// Final status wins when it is decisive; otherwise an approved
    /// procurement status only means the order was reviewed.
    pub fn display_status(&self) -> DisplayStatus {
        match (self.final_status, self.status) {
            (Some(FinalStatus::Rejected), _) => DisplayStatus::Declined,
            (Some(FinalStatus::Approved), _) => DisplayStatus::Approved,
            (_, ProcurementStatus::Approved) => DisplayStatus::Reviewed,
            _ => DisplayStatus::Pending,
        }
    }

    /// Orders that left the pipeline: rejected or dispatched.
    pub fn is_closed(&self) -> bool {
        matches!(
            self.final_status,
            Some(FinalStatus::Rejected) | Some(FinalStatus::Dispatch)
        )
    }
}

/// Order request payload, one per cart line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    pub product_id: ProductId,
    pub quantity: u32,
    pub total_price: Decimal,
    pub status: ProcurementStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(status: &str, final_status: Option<&str>) -> Order {
        let json = serde_json::json!({
            "id": 1,
            "status": status,
            "final_status": final_status,
        });
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn approved_status_with_pending_final_renders_reviewed() {
        assert_eq!(order("approved", Some("pending")).display_status(), DisplayStatus::Reviewed);
    }

    #[test]
    fn approved_final_status_renders_approved() {
        let approved = order("approved", Some("approved"));
        assert_eq!(approved.display_status(), DisplayStatus::Approved);
        assert_eq!(approved.display_status().color(), "green");
    }

    #[test]
    fn rejected_final_status_always_renders_declined() {
        for status in ["pending", "reviewed", "approved", "declined"] {
            let rejected = order(status, Some("rejected"));
            assert_eq!(rejected.display_status(), DisplayStatus::Declined);
            assert_eq!(rejected.display_status().color(), "red");
        }
    }

    #[test]
    fn everything_else_renders_pending() {
        assert_eq!(order("pending", None).display_status(), DisplayStatus::Pending);
        assert_eq!(order("reviewed", Some("dispatch")).display_status(), DisplayStatus::Pending);
        assert_eq!(order("whatever", None).status, ProcurementStatus::Other);
    }

    #[test]
    fn closed_orders_are_rejected_or_dispatched() {
        assert!(order("approved", Some("dispatch")).is_closed());
        assert!(order("approved", Some("rejected")).is_closed());
        assert!(!order("approved", Some("approved")).is_closed());
        assert!(!order("pending", None).is_closed());
    }

    #[test]
    fn new_order_serializes_pending_status() {
        let payload = NewOrder {
            product_id: 3,
            quantity: 2,
            total_price: Decimal::new(2000, 2),
            status: ProcurementStatus::Pending,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["product_id"], 3);
    }

    #[test]
    fn order_products_accept_ids_or_objects() {
        let json = r#"{"id": 5, "products": [4, {"id": 6, "title": "Ink"}]}"#;
        let order: Order = serde_json::from_str(json).unwrap();

        assert_eq!(order.products[0].id(), Some(4));
        assert_eq!(order.products[1].title(), Some("Ink"));
    }

    #[test]
    fn null_or_malformed_fields_fall_back_to_defaults() {
        let orders: Vec<Order> = serde_json::from_str(
            r#"[
                {"id": 1, "status": null, "quantity": null, "total_price": ""},
                {"id": 2, "status": 3, "final_status": null, "total_price": "$9.00"}
            ]"#,
        )
        .unwrap();

        assert_eq!(orders[0].status, ProcurementStatus::Pending);
        assert_eq!(orders[0].quantity, 0);
        assert_eq!(orders[0].total_price, None);
        assert_eq!(orders[1].status, ProcurementStatus::Pending);
        assert_eq!(orders[1].display_status(), DisplayStatus::Pending);
        assert_eq!(orders[1].total_price, Some("9".parse().unwrap()));
    }
}
