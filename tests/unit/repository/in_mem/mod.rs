mod category;

use std::boxed::Box;
use std::sync::Arc;

use async_trait::async_trait;

use comercial::datastore::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemDeleteInfo, AppInMemDstoreLock,
    AppInMemFetchKeys, AppInMemFetchedData, AppInMemUpdateData,
};
use comercial::error::{AppError, AppErrorCode};
use comercial::{AppDataStoreContext, AppInMemoryDbCfg};

fn in_mem_ds_ctx_setup<T: AbstInMemoryDStore + 'static>(max_items: u32) -> Arc<AppDataStoreContext> {
    let d = AppInMemoryDbCfg {
        alias: "utest".to_string(),
        max_items,
    };
    let obj: Box<dyn AbstInMemoryDStore> = Box::new(T::new(&d));
    Arc::new(AppDataStoreContext {
        in_mem: Some(Arc::new(obj)),
    })
}

// every data access fails, as if the datastore were unreachable
struct MockInMemDeadDataStore {}

fn ut_dead_error() -> AppError {
    AppError {
        code: AppErrorCode::AcquireLockFailure,
        detail: Some("utest".to_string()),
    }
}

#[async_trait]
impl AbstInMemoryDStore for MockInMemDeadDataStore {
    fn new(_cfg: &AppInMemoryDbCfg) -> Self
    where
        Self: Sized,
    {
        Self {}
    }
    async fn create_table(&self, _label: &str) -> Result<(), AppError> {
        Ok(())
    }
    async fn save(&self, _data: AppInMemUpdateData) -> Result<usize, AppError> {
        Err(ut_dead_error())
    }
    async fn delete(&self, _info: AppInMemDeleteInfo) -> Result<usize, AppError> {
        Err(ut_dead_error())
    }
    async fn fetch(&self, _info: AppInMemFetchKeys) -> Result<AppInMemFetchedData, AppError> {
        Err(ut_dead_error())
    }
    async fn fetch_acquire(
        &self,
        _info: AppInMemFetchKeys,
    ) -> Result<(AppInMemFetchedData, AppInMemDstoreLock), AppError> {
        Err(ut_dead_error())
    }
    fn save_release(
        &self,
        _data: AppInMemUpdateData,
        _lock: AppInMemDstoreLock,
    ) -> Result<usize, AppError> {
        Err(ut_dead_error())
    }
    fn delete_release(
        &self,
        _info: AppInMemDeleteInfo,
        _lock: AppInMemDstoreLock,
    ) -> Result<usize, AppError> {
        Err(ut_dead_error())
    }
    async fn filter_keys(
        &self,
        _tbl_label: String,
        _op: &dyn AbsDStoreFilterKeyOp,
    ) -> Result<Vec<String>, AppError> {
        Err(ut_dead_error())
    }
    async fn num_rows(&self, _tbl_label: &str) -> Result<usize, AppError> {
        Err(ut_dead_error())
    }
} // end of impl MockInMemDeadDataStore

#[tokio::test]
async fn build_repo_without_datastore() {
    let ds = Arc::new(AppDataStoreContext { in_mem: None });
    let logctx = crate::ut_log_context();
    let result = comercial::repository::app_repo_product(ds.clone(), logctx.clone()).await;
    let e = result.err().unwrap();
    assert_eq!(e.code, AppErrorCode::DatastoreUnavailable);
    assert!(e.is_datastore_unavailable());
    let result = comercial::repository::app_repo_order_item(ds, logctx).await;
    assert_eq!(result.err().unwrap().code, AppErrorCode::DatastoreUnavailable);
}

#[tokio::test]
async fn build_repo_from_shared_state() {
    let shr_state = crate::ut_setup_share_state("config_ok.json");
    let ds = shr_state.datastore();
    assert!(ds.in_mem.is_some());
    let logctx = shr_state.log_context().clone();
    assert!(logctx.get_assigner("comercial::repository::in_mem").is_some());
    let result = comercial::repository::app_repo_category(ds, logctx).await;
    assert!(result.is_ok());
    let repo = result.unwrap();
    assert_eq!(repo.count().await.unwrap(), 0);
}
