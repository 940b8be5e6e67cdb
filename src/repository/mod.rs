use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;
use std::vec::Vec;

use async_trait::async_trait;

use crate::error::{AppError, AppErrorCode};
use crate::logging::AppLogContext;
use crate::model::{CategoryModel, OrderItemKey, OrderItemModel, ProductId, ProductModel};
use crate::AppDataStoreContext;

mod in_mem;
pub use in_mem::{AbsInMemKey, AbsInMemRecord, InMemStore, SEQUENCE_TABLE_LABEL};

/// Storage contract shared by all entity stores, `M` is the entity model
/// and `K` is the type of its identity.
///
/// Lookup operations report absent records as `None` or by skipping them,
/// never as an error. Errors from the underlying datastore are returned
/// to callers unchanged.
//
// the repository instance may be used across an await,
// the future created by app callers has to be able to pass to different threads
// , it is the reason to add `Send` and `Sync` as super-traits
#[async_trait]
pub trait AbsRepository<M, K>: Sync + Send
where
    M: Send + 'static,
    K: Send + Sync + 'static,
{
    /// insert the record if its key is absent in the store, otherwise
    /// replace the existing one. For entities with surrogate key, a new
    /// identifier is assigned when the model does not carry one.
    async fn save(&self, obj: M) -> DefaultResult<M, AppError>;

    /// same as `save()` for a batch of records, applied atomically
    async fn save_all(&self, objs: Vec<M>) -> DefaultResult<Vec<M>, AppError>;

    /// strict insertion, fails with `ConstraintViolation` if the key exists
    async fn insert(&self, obj: M) -> DefaultResult<M, AppError>;

    async fn find_by_id(&self, id: &K) -> DefaultResult<Option<M>, AppError>;

    async fn find_all_by_id(&self, ids: Vec<K>) -> DefaultResult<Vec<M>, AppError>;

    async fn find_all(&self) -> DefaultResult<Vec<M>, AppError>;

    /// fails with `RecordNotExist` if the key is absent
    async fn delete_by_id(&self, id: &K) -> DefaultResult<(), AppError>;

    async fn count(&self) -> DefaultResult<usize, AppError>;

    async fn exists_by_id(&self, id: &K) -> DefaultResult<bool, AppError>;
}

pub trait AbsProductRepo: AbsRepository<ProductModel, ProductId> {}
impl<T: AbsRepository<ProductModel, ProductId>> AbsProductRepo for T {}

pub trait AbsOrderItemRepo: AbsRepository<OrderItemModel, OrderItemKey> {}
impl<T: AbsRepository<OrderItemModel, OrderItemKey>> AbsOrderItemRepo for T {}

pub trait AbsCategoryRepo: AbsRepository<CategoryModel, u64> {}
impl<T: AbsRepository<CategoryModel, u64>> AbsCategoryRepo for T {}

pub type ProductInMemRepo = InMemStore<ProductModel>;
pub type OrderItemInMemRepo = InMemStore<OrderItemModel>;
pub type CategoryInMemRepo = InMemStore<CategoryModel>;

fn missing_datastore() -> AppError {
    AppError {
        code: AppErrorCode::DatastoreUnavailable,
        detail: Some("in-memory".to_string()),
    }
}

pub async fn app_repo_product(
    ds: Arc<AppDataStoreContext>,
    logctx: Arc<AppLogContext>,
) -> DefaultResult<Box<dyn AbsProductRepo>, AppError> {
    let m = ds.in_mem.as_ref().ok_or_else(missing_datastore)?;
    let obj = ProductInMemRepo::new(m.clone(), logctx).await?;
    Ok(Box::new(obj))
}

pub async fn app_repo_order_item(
    ds: Arc<AppDataStoreContext>,
    logctx: Arc<AppLogContext>,
) -> DefaultResult<Box<dyn AbsOrderItemRepo>, AppError> {
    let m = ds.in_mem.as_ref().ok_or_else(missing_datastore)?;
    let obj = OrderItemInMemRepo::new(m.clone(), logctx).await?;
    Ok(Box::new(obj))
}

pub async fn app_repo_category(
    ds: Arc<AppDataStoreContext>,
    logctx: Arc<AppLogContext>,
) -> DefaultResult<Box<dyn AbsCategoryRepo>, AppError> {
    let m = ds.in_mem.as_ref().ok_or_else(missing_datastore)?;
    let obj = CategoryInMemRepo::new(m.clone(), logctx).await?;
    Ok(Box::new(obj))
}
