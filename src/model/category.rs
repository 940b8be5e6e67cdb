use std::result::Result as DefaultResult;

use crate::error::{AppError, AppErrorCode};

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryModel {
    pub id: Option<u64>,
    pub name: String,
}

impl CategoryModel {
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
        }
    }

    pub fn validate(&self) -> DefaultResult<(), AppError> {
        if self.name.trim().is_empty() {
            Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("category-name-empty, id:{:?}", self.id)),
            })
        } else {
            Ok(())
        }
    }
}
