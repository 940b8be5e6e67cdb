mod in_mem;

use std::boxed::Box;
use std::sync::Arc;

pub use in_mem::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemDeleteInfo, AppInMemDstoreLock,
    AppInMemFetchKeys, AppInMemFetchedData, AppInMemFetchedSingleRow, AppInMemFetchedSingleTable,
    AppInMemUpdateData, AppInMemoryDStore,
};

use crate::config::AppDataStoreCfg;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};

pub(crate) fn build_context(
    logctx: Arc<AppLogContext>,
    cfg: &[AppDataStoreCfg],
) -> Option<Box<dyn AbstInMemoryDStore>> {
    let mut inmem = None;
    for c in cfg {
        match c {
            AppDataStoreCfg::InMemory(d) => {
                if inmem.is_some() {
                    app_log_event!(
                        logctx,
                        AppLogLevel::WARNING,
                        "duplicate in-memory datastore, ignored alias:{}",
                        d.alias
                    );
                    continue;
                }
                let item: Box<dyn AbstInMemoryDStore> = Box::new(AppInMemoryDStore::new(d));
                app_log_event!(
                    logctx,
                    AppLogLevel::INFO,
                    "in-memory datastore ready, alias:{}, max-items:{}",
                    d.alias,
                    d.max_items
                );
                inmem = Some(item);
            }
        }
    }
    inmem
}
