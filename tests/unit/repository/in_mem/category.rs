use comercial::datastore::AppInMemoryDStore;
use comercial::error::AppErrorCode;
use comercial::model::{CategoryModel, ProductModel};
use comercial::repository::{app_repo_category, app_repo_product};

use super::in_mem_ds_ctx_setup;

#[tokio::test]
async fn save_find_delete_ok() {
    let ds = in_mem_ds_ctx_setup::<AppInMemoryDStore>(20);
    let logctx = crate::ut_log_context();
    let repo = app_repo_category(ds, logctx).await.unwrap();
    let objs = vec![CategoryModel::new("Electronics"), CategoryModel::new("Garden")];
    let saved = repo.save_all(objs).await.unwrap();
    assert!(saved.iter().all(|c| c.id.is_some()));
    let found = repo.find_by_id(&saved[1].id.unwrap()).await.unwrap().unwrap();
    assert_eq!(found, saved[1]);
    assert!(repo.delete_by_id(&saved[0].id.unwrap()).await.is_ok());
    assert_eq!(repo.count().await.unwrap(), 1);
    let e = repo.save(CategoryModel::new(" ")).await.err().unwrap();
    assert_eq!(e.code, AppErrorCode::InvalidInput);
}

#[tokio::test]
async fn sequence_independent_per_table() {
    let ds = in_mem_ds_ctx_setup::<AppInMemoryDStore>(20);
    let logctx = crate::ut_log_context();
    let cate_repo = app_repo_category(ds.clone(), logctx.clone()).await.unwrap();
    let prod_repo = app_repo_product(ds, logctx).await.unwrap();
    let c1 = cate_repo.save(CategoryModel::new("Toys")).await.unwrap();
    let c2 = cate_repo.save(CategoryModel::new("Books")).await.unwrap();
    assert_eq!((c1.id, c2.id), (Some(1), Some(2)));
    let mut p = ProductModel::new("Puzzle", "", rust_decimal::Decimal::new(12, 0), "");
    p.add_category(c1.id.unwrap());
    p.add_category(c2.id.unwrap());
    let p = prod_repo.save(p).await.unwrap();
    assert_eq!(p.id, Some(1));
    let found = prod_repo.find_by_id(&1).await.unwrap().unwrap();
    assert_eq!(found.category_ids, vec![1, 2]);
    // categories referenced by products are not protected from removal
    assert!(cate_repo.delete_by_id(&1).await.is_ok());
    let found = prod_repo.find_by_id(&1).await.unwrap().unwrap();
    assert_eq!(found.category_ids, vec![1, 2]);
}
