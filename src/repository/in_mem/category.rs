use std::result::Result as DefaultResult;

use super::{take_column, AbsInMemRecord};
use crate::datastore::AppInMemFetchedSingleRow;
use crate::error::AppError;
use crate::model::CategoryModel;

const COL_IDX_NAME: usize = 0;

impl AbsInMemRecord for CategoryModel {
    type Key = u64;
    const TABLE_LABEL: &'static str = "category";

    fn key(&self) -> Option<u64> {
        self.id
    }

    fn set_key(&mut self, key: u64) {
        self.id = Some(key);
    }

    fn validate(&self) -> DefaultResult<(), AppError> {
        CategoryModel::validate(self)
    }

    fn to_row(&self) -> AppInMemFetchedSingleRow {
        vec![self.name.clone()]
    }

    fn try_from_row(key: u64, mut row: AppInMemFetchedSingleRow) -> DefaultResult<Self, AppError> {
        let name = take_column(&mut row, COL_IDX_NAME, "name")?;
        Ok(Self {
            id: Some(key),
            name,
        })
    }
}
