use rust_decimal::Decimal;

use comercial::error::AppErrorCode;
use comercial::model::{CategoryModel, ProductModel};

#[test]
fn new_product_without_id() {
    let m = ProductModel::new("Widget", "small widget", Decimal::new(1999, 2), "");
    assert!(m.id.is_none());
    assert!(m.category_ids.is_empty());
    assert!(m.validate().is_ok());
}

#[test]
fn add_category_no_duplicate() {
    let mut m = ProductModel::new("Widget", "", Decimal::new(5, 0), "");
    m.add_category(3);
    m.add_category(1);
    m.add_category(3);
    assert_eq!(m.category_ids, vec![3, 1]);
}

#[test]
fn validate_error() {
    let m = ProductModel::new("  ", "", Decimal::new(5, 0), "");
    let e = m.validate().err().unwrap();
    assert_eq!(e.code, AppErrorCode::InvalidInput);
    let m = ProductModel::new("Widget", "", Decimal::new(-5, 1), "");
    let e = m.validate().err().unwrap();
    assert_eq!(e.code, AppErrorCode::InvalidInput);
    assert!(e.detail.unwrap().contains("-0.5"));
    let m = ProductModel::new("Free sample", "", Decimal::ZERO, "");
    assert!(m.validate().is_ok());
}

#[test]
fn category_validate() {
    assert!(CategoryModel::new("Electronics").validate().is_ok());
    let e = CategoryModel::new("").validate().err().unwrap();
    assert_eq!(e.code, AppErrorCode::InvalidInput);
}
