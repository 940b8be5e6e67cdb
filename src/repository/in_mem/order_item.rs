use std::result::Result as DefaultResult;

use rust_decimal::Decimal;

use super::{parse_column, AbsInMemKey, AbsInMemRecord};
use crate::datastore::AppInMemFetchedSingleRow;
use crate::error::{AppError, AppErrorCode};
use crate::model::{OrderItemKey, OrderItemModel};

enum InMemColIdx {
    Quantity,
    Price,
    TotNumColumns,
}

impl From<InMemColIdx> for usize {
    fn from(value: InMemColIdx) -> usize {
        match value {
            InMemColIdx::Quantity => 0,
            InMemColIdx::Price => 1,
            InMemColIdx::TotNumColumns => 2,
        }
    }
}

// row key of the table `order_item` is `<order-id>-<product-id>`
impl AbsInMemKey for OrderItemKey {
    fn to_pkey(&self) -> String {
        self.to_string()
    }

    fn try_from_pkey(raw: &str) -> DefaultResult<Self, AppError> {
        let corrupted = || AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(format!("order-item-pkey:{raw}")),
        };
        let (oid, pid) = raw.split_once('-').ok_or_else(corrupted)?;
        let order_id = oid.parse::<u64>().map_err(|_e| corrupted())?;
        let product_id = pid.parse::<u64>().map_err(|_e| corrupted())?;
        Ok(Self {
            order_id,
            product_id,
        })
    }
}

impl AbsInMemRecord for OrderItemModel {
    type Key = OrderItemKey;
    const TABLE_LABEL: &'static str = "order_item";

    fn key(&self) -> Option<OrderItemKey> {
        Some(self.id_)
    }

    fn set_key(&mut self, key: OrderItemKey) {
        self.id_ = key;
    }

    fn validate(&self) -> DefaultResult<(), AppError> {
        OrderItemModel::validate(self)
    }

    fn to_row(&self) -> AppInMemFetchedSingleRow {
        let num_cols: usize = InMemColIdx::TotNumColumns.into();
        let mut row = vec![String::new(); num_cols];
        let qty_idx: usize = InMemColIdx::Quantity.into();
        let price_idx: usize = InMemColIdx::Price.into();
        row[qty_idx] = self.quantity.to_string();
        row[price_idx] = self.price.to_string();
        row
    }

    fn try_from_row(
        key: OrderItemKey,
        mut row: AppInMemFetchedSingleRow,
    ) -> DefaultResult<Self, AppError> {
        let quantity = parse_column::<u32>(&mut row, InMemColIdx::Quantity.into(), "quantity")?;
        let price = parse_column::<Decimal>(&mut row, InMemColIdx::Price.into(), "price")?;
        Ok(Self {
            id_: key,
            quantity,
            price,
        })
    }
}
