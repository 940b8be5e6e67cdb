use std::fmt::Display;
use std::result::Result as DefaultResult;

use rust_decimal::Decimal;

use crate::error::{AppError, AppErrorCode};

/// Identity of an order line, a product appears at most once in an order.
///
/// Keys are compared and hashed by both fields, ordering applies order ID
/// first then product ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderItemKey {
    pub order_id: u64,
    pub product_id: u64,
}

impl OrderItemKey {
    pub fn new(order_id: u64, product_id: u64) -> Self {
        Self {
            order_id,
            product_id,
        }
    }
}

impl From<(u64, u64)> for OrderItemKey {
    fn from(value: (u64, u64)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl Display for OrderItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.order_id, self.product_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemModel {
    pub id_: OrderItemKey,
    pub quantity: u32,
    // unit price at the time the product is ordered
    pub price: Decimal,
}

impl OrderItemModel {
    pub fn new(order_id: u64, product_id: u64, quantity: u32, price: Decimal) -> Self {
        Self {
            id_: OrderItemKey::new(order_id, product_id),
            quantity,
            price,
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    pub fn validate(&self) -> DefaultResult<(), AppError> {
        if self.quantity == 0 {
            Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("order-item-zero-qty: {}", self.id_)),
            })
        } else if self.price < Decimal::ZERO {
            Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("order-item-price-negative: {}", self.id_)),
            })
        } else {
            Ok(())
        }
    }
}
