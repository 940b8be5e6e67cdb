use std::result::Result as DefaultResult;

use rust_decimal::Decimal;

use super::{parse_column, take_column, AbsInMemRecord};
use crate::datastore::AppInMemFetchedSingleRow;
use crate::error::{AppError, AppErrorCode};
use crate::model::{ProductId, ProductModel};

enum InMemColIdx {
    Name,
    Description,
    Price,
    ImgUrl,
    CategoryIds,
    TotNumColumns,
}

impl From<InMemColIdx> for usize {
    fn from(value: InMemColIdx) -> usize {
        match value {
            InMemColIdx::Name => 0,
            InMemColIdx::Description => 1,
            InMemColIdx::Price => 2,
            InMemColIdx::ImgUrl => 3,
            InMemColIdx::CategoryIds => 4,
            InMemColIdx::TotNumColumns => 5,
        }
    }
}

const CATEGORY_DELIMITER: &str = ",";

fn parse_category_ids(raw: &str) -> DefaultResult<Vec<u64>, AppError> {
    raw.split(CATEGORY_DELIMITER)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>().map_err(|_e| AppError {
                code: AppErrorCode::DataCorruption,
                detail: Some(format!("product-category-id:{s}")),
            })
        })
        .collect()
}

impl AbsInMemRecord for ProductModel {
    type Key = ProductId;
    const TABLE_LABEL: &'static str = "product";

    fn key(&self) -> Option<ProductId> {
        self.id
    }

    fn set_key(&mut self, key: ProductId) {
        self.id = Some(key);
    }

    fn validate(&self) -> DefaultResult<(), AppError> {
        ProductModel::validate(self)
    }

    fn normalize(&mut self) {
        self.dedup_categories();
    }

    fn to_row(&self) -> AppInMemFetchedSingleRow {
        let num_cols: usize = InMemColIdx::TotNumColumns.into();
        let mut row = vec![String::new(); num_cols];
        let cate_ids = self
            .category_ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(CATEGORY_DELIMITER);
        [
            (InMemColIdx::CategoryIds, cate_ids),
            (InMemColIdx::ImgUrl, self.img_url.clone()),
            (InMemColIdx::Price, self.price.to_string()),
            (InMemColIdx::Description, self.description.clone()),
            (InMemColIdx::Name, self.name.clone()),
        ]
        .into_iter()
        .for_each(|(idx, val)| {
            let idx: usize = idx.into();
            row[idx] = val;
        });
        row
    }

    fn try_from_row(
        key: ProductId,
        mut row: AppInMemFetchedSingleRow,
    ) -> DefaultResult<Self, AppError> {
        let name = take_column(&mut row, InMemColIdx::Name.into(), "name")?;
        let description = take_column(&mut row, InMemColIdx::Description.into(), "description")?;
        let price = parse_column::<Decimal>(&mut row, InMemColIdx::Price.into(), "price")?;
        let img_url = take_column(&mut row, InMemColIdx::ImgUrl.into(), "img_url")?;
        let raw_cates = take_column(&mut row, InMemColIdx::CategoryIds.into(), "category_ids")?;
        Ok(Self {
            id: Some(key),
            name,
            description,
            price,
            img_url,
            category_ids: parse_category_ids(raw_cates.as_str())?,
        })
    }
} // end of impl AbsInMemRecord for ProductModel
