use std::result::Result as DefaultResult;

use rust_decimal::Decimal;

use crate::error::{AppError, AppErrorCode};

pub type ProductId = u64;

#[derive(Debug, Clone, PartialEq)]
pub struct ProductModel {
    // absent until the product is saved for the first time
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub img_url: String,
    pub category_ids: Vec<u64>,
}

impl ProductModel {
    pub fn new(name: &str, description: &str, price: Decimal, img_url: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            description: description.to_string(),
            price,
            img_url: img_url.to_string(),
            category_ids: Vec::new(),
        }
    }

    pub fn add_category(&mut self, category_id: u64) {
        if !self.category_ids.contains(&category_id) {
            self.category_ids.push(category_id);
        }
    }

    pub fn validate(&self) -> DefaultResult<(), AppError> {
        if self.name.trim().is_empty() {
            Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("product-name-empty, id:{:?}", self.id)),
            })
        } else if self.price < Decimal::ZERO {
            Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("product-price-negative: {}", self.price)),
            })
        } else {
            Ok(())
        }
    }

    /// remove duplicate category references, keep the first occurrence
    pub(crate) fn dedup_categories(&mut self) {
        let mut seen = Vec::with_capacity(self.category_ids.len());
        self.category_ids.retain(|c| {
            if seen.contains(c) {
                false
            } else {
                seen.push(*c);
                true
            }
        });
    }
} // end of impl ProductModel
