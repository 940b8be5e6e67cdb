use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::config::AppInMemoryDbCfg;
use crate::error::{AppError, AppErrorCode};

// simple implementation of in-memory data storage

// application callers are responsible to maintain the structure
// of each row in each table. Each element of a row is stringified
// regardless of its original types (integer, decimal number)
type InnerRow = Vec<String>;
type InnerTable = HashMap<String, InnerRow>;
type AllTable = HashMap<String, InnerTable>;
pub type AppInMemUpdateData = AllTable;
pub type AppInMemDeleteInfo = HashMap<String, Vec<String>>; // list of IDs per table
pub type AppInMemFetchKeys = HashMap<String, Vec<String>>; // list of IDs per table
pub type AppInMemFetchedData = AllTable;
pub type AppInMemFetchedSingleTable = InnerTable;
pub type AppInMemFetchedSingleRow = InnerRow;
/// lock guard of all tables, callers which hold the guard are able to
/// read, modify, then write rows atomically
pub type AppInMemDstoreLock = OwnedMutexGuard<AllTable>;

pub trait AbsDStoreFilterKeyOp: Send + Sync {
    fn filter(&self, k: &String, v: &Vec<String>) -> bool;
}

// the data store instance may be used across an await, it has to be able to
// pass to different threads
#[async_trait]
pub trait AbstInMemoryDStore: Send + Sync {
    fn new(cfg: &AppInMemoryDbCfg) -> Self
    where
        Self: Sized;
    async fn create_table(&self, label: &str) -> DefaultResult<(), AppError>;
    async fn save(&self, data: AppInMemUpdateData) -> DefaultResult<usize, AppError>;
    async fn delete(&self, info: AppInMemDeleteInfo) -> DefaultResult<usize, AppError>;
    async fn fetch(&self, info: AppInMemFetchKeys) -> DefaultResult<AppInMemFetchedData, AppError>;
    async fn fetch_acquire(
        &self,
        info: AppInMemFetchKeys,
    ) -> DefaultResult<(AppInMemFetchedData, AppInMemDstoreLock), AppError>;
    fn save_release(
        &self,
        data: AppInMemUpdateData,
        lock: AppInMemDstoreLock,
    ) -> DefaultResult<usize, AppError>;
    fn delete_release(
        &self,
        info: AppInMemDeleteInfo,
        lock: AppInMemDstoreLock,
    ) -> DefaultResult<usize, AppError>;
    async fn filter_keys(
        &self,
        tbl_label: String,
        op: &dyn AbsDStoreFilterKeyOp,
    ) -> DefaultResult<Vec<String>, AppError>;
    async fn num_rows(&self, tbl_label: &str) -> DefaultResult<usize, AppError>;
}

pub struct AppInMemoryDStore {
    max_items_per_table: u32,
    table_map: Arc<Mutex<AllTable>>,
}

impl AppInMemoryDStore {
    fn _check_capacity(&self, _map: &AllTable, _data: &AppInMemUpdateData) -> DefaultResult<(), AppError> {
        // number of rows in each table after the update, existing keys are
        // replaced so only new keys are counted
        let limit = self.max_items_per_table as usize;
        let mut invalid = _data.iter().filter(|(label, d_grp)| {
            _map.get(label.as_str())
                .map(|table| {
                    let num_new = d_grp.keys().filter(|k| !table.contains_key(k.as_str())).count();
                    table.len() + num_new > limit
                })
                .unwrap_or(false)
        });
        if let Some((label, _)) = invalid.next() {
            let msg = format!("table:{label}, limit:{limit}");
            Err(AppError {
                detail: Some(msg),
                code: AppErrorCode::ExceedingMaxLimit,
            })
        } else {
            Ok(())
        }
    }

    fn _check_table_existence<'a, I>(_map: &AllTable, mut labels: I) -> DefaultResult<(), AppError>
    where
        I: Iterator<Item = &'a String>,
    {
        if let Some(d) = labels.find(|label| !_map.contains_key(label.as_str())) {
            Err(AppError {
                detail: Some(d.to_string()),
                code: AppErrorCode::DataTableNotExist,
            })
        } else {
            Ok(())
        }
    }

    fn _save_common(&self, _map: &mut AllTable, _data: AppInMemUpdateData) -> DefaultResult<usize, AppError> {
        Self::_check_table_existence(_map, _data.keys())?;
        self._check_capacity(_map, &_data)?;
        let tot_cnt = _data
            .into_iter()
            .filter_map(|(label, d_grp)| {
                _map.get_mut(label.as_str()).map(|table| {
                    let num = d_grp.len();
                    table.extend(d_grp);
                    num
                })
            })
            .sum();
        Ok(tot_cnt)
    }

    fn _delete_common(_map: &mut AllTable, _info: AppInMemDeleteInfo) -> DefaultResult<usize, AppError> {
        Self::_check_table_existence(_map, _info.keys())?;
        let tot_cnt = _info
            .iter()
            .filter_map(|(label, ids)| {
                _map.get_mut(label.as_str()).map(|table| {
                    ids.iter().filter_map(|id| table.remove(id)).count()
                })
            })
            .sum();
        Ok(tot_cnt)
    }

    fn _fetch_common(_map: &AllTable, _info: AppInMemFetchKeys) -> DefaultResult<AppInMemFetchedData, AppError> {
        Self::_check_table_existence(_map, _info.keys())?;
        let rs_a = _info
            .into_iter()
            .filter_map(|(label, ids)| {
                _map.get(label.as_str()).map(|table| {
                    let rs_t = ids
                        .into_iter()
                        .filter_map(|id| table.get(id.as_str()).map(|row| (id, row.clone())))
                        .collect::<InnerTable>();
                    (label, rs_t)
                })
            })
            .collect::<AllTable>();
        Ok(rs_a)
    }
} // end of impl AppInMemoryDStore

#[async_trait]
impl AbstInMemoryDStore for AppInMemoryDStore {
    fn new(cfg: &AppInMemoryDbCfg) -> Self {
        let t_map = Arc::new(Mutex::new(HashMap::new()));
        Self {
            table_map: t_map,
            max_items_per_table: cfg.max_items,
        }
    }

    async fn create_table(&self, label: &str) -> DefaultResult<(), AppError> {
        let mut _map = self.table_map.lock().await;
        if !_map.contains_key(label) {
            _map.insert(label.to_string(), HashMap::new());
        }
        Ok(())
    }

    async fn save(&self, data: AppInMemUpdateData) -> DefaultResult<usize, AppError> {
        let mut _map = self.table_map.lock().await;
        self._save_common(&mut _map, data)
    }

    async fn delete(&self, info: AppInMemDeleteInfo) -> DefaultResult<usize, AppError> {
        let mut _map = self.table_map.lock().await;
        Self::_delete_common(&mut _map, info)
    }

    async fn fetch(&self, info: AppInMemFetchKeys) -> DefaultResult<AppInMemFetchedData, AppError> {
        let _map = self.table_map.lock().await;
        Self::_fetch_common(&_map, info)
    }

    async fn fetch_acquire(
        &self,
        info: AppInMemFetchKeys,
    ) -> DefaultResult<(AppInMemFetchedData, AppInMemDstoreLock), AppError> {
        let guard = self.table_map.clone().lock_owned().await;
        let fetched = Self::_fetch_common(&guard, info)?;
        Ok((fetched, guard))
    } // the guard is released when callers drop it, or pass it to
      // `save_release()` / `delete_release()`

    fn save_release(
        &self,
        data: AppInMemUpdateData,
        mut lock: AppInMemDstoreLock,
    ) -> DefaultResult<usize, AppError> {
        self._save_common(&mut lock, data)
    }

    fn delete_release(
        &self,
        info: AppInMemDeleteInfo,
        mut lock: AppInMemDstoreLock,
    ) -> DefaultResult<usize, AppError> {
        Self::_delete_common(&mut lock, info)
    }

    async fn filter_keys(
        &self,
        tbl_label: String,
        op: &dyn AbsDStoreFilterKeyOp,
    ) -> DefaultResult<Vec<String>, AppError> {
        let _map = self.table_map.lock().await;
        if let Some(table) = _map.get(tbl_label.as_str()) {
            let out = table
                .iter()
                .filter(|(k, v)| op.filter(k, v))
                .map(|(k, _v)| k.clone())
                .collect();
            Ok(out)
        } else {
            Err(AppError {
                detail: Some(tbl_label),
                code: AppErrorCode::DataTableNotExist,
            })
        }
    }

    async fn num_rows(&self, tbl_label: &str) -> DefaultResult<usize, AppError> {
        let _map = self.table_map.lock().await;
        _map.get(tbl_label)
            .map(|table| table.len())
            .ok_or(AppError {
                detail: Some(tbl_label.to_string()),
                code: AppErrorCode::DataTableNotExist,
            })
    }
} // end of impl AppInMemoryDStore
