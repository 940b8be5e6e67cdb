pub(super) mod category;
pub(super) mod order_item;
pub(super) mod product;

use std::boxed::Box;
use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use super::AbsRepository;
use crate::datastore::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemFetchedSingleRow,
    AppInMemFetchedSingleTable,
};
use crate::error::{AppError, AppErrorCode};
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};

/// table which keeps the last identifier assigned to each table of
/// entities with surrogate key, rows are keyed by table label
pub const SEQUENCE_TABLE_LABEL: &str = "id_sequence";

/// conversion between entity identity and row key in the in-memory datastore
pub trait AbsInMemKey: Sized + Clone + Send + Sync + 'static {
    fn to_pkey(&self) -> String;
    fn try_from_pkey(raw: &str) -> DefaultResult<Self, AppError>;
    // surrogate keys are generated from sequence number, composite keys
    // are always given by callers
    fn from_sequence(_seq: u64) -> Option<Self> {
        None
    }
    fn sequence_num(&self) -> Option<u64> {
        None
    }
}

pub trait AbsInMemRecord: Sized + Send + Sync + 'static {
    type Key: AbsInMemKey;
    const TABLE_LABEL: &'static str;

    fn key(&self) -> Option<Self::Key>;
    fn set_key(&mut self, key: Self::Key);
    fn validate(&self) -> DefaultResult<(), AppError>;
    // applied before validation and row conversion
    fn normalize(&mut self) {}
    fn to_row(&self) -> AppInMemFetchedSingleRow;
    fn try_from_row(key: Self::Key, row: AppInMemFetchedSingleRow)
        -> DefaultResult<Self, AppError>;
}

impl AbsInMemKey for u64 {
    fn to_pkey(&self) -> String {
        self.to_string()
    }
    fn try_from_pkey(raw: &str) -> DefaultResult<Self, AppError> {
        raw.parse::<u64>().map_err(|e| AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(format!("pkey:{raw}, reason:{e}")),
        })
    }
    fn from_sequence(seq: u64) -> Option<Self> {
        Some(seq)
    }
    fn sequence_num(&self) -> Option<u64> {
        Some(*self)
    }
}

pub(super) fn parse_column<T: std::str::FromStr>(
    row: &mut AppInMemFetchedSingleRow,
    idx: usize,
    label: &str,
) -> DefaultResult<T, AppError> {
    let raw = take_column(row, idx, label)?;
    raw.parse::<T>().map_err(|_e| AppError {
        code: AppErrorCode::DataCorruption,
        detail: Some(format!("column:{label}, value:{raw}")),
    })
}

pub(super) fn take_column(
    row: &mut AppInMemFetchedSingleRow,
    idx: usize,
    label: &str,
) -> DefaultResult<String, AppError> {
    row.get_mut(idx).map(std::mem::take).ok_or(AppError {
        code: AppErrorCode::DataCorruption,
        detail: Some(format!("column-missing:{label}, idx:{idx}")),
    })
}

struct AllRowsFilter;

impl AbsDStoreFilterKeyOp for AllRowsFilter {
    fn filter(&self, _k: &String, _v: &Vec<String>) -> bool {
        true
    }
}

/// Generic store of one entity type, instantiated per model on top of the
/// shared in-memory datastore.
pub struct InMemStore<M> {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
    logctx: Arc<AppLogContext>,
    _model: PhantomData<fn() -> M>,
}

impl<M: AbsInMemRecord> InMemStore<M> {
    pub async fn new(
        m: Arc<Box<dyn AbstInMemoryDStore>>,
        logctx: Arc<AppLogContext>,
    ) -> DefaultResult<Self, AppError> {
        m.create_table(M::TABLE_LABEL).await?;
        m.create_table(SEQUENCE_TABLE_LABEL).await?;
        Ok(Self {
            datastore: m,
            logctx,
            _model: PhantomData,
        })
    }

    fn log_failure(&self, op: &str, e: AppError) -> AppError {
        let logctx = &self.logctx;
        match &e.code {
            AppErrorCode::ConstraintViolation
            | AppErrorCode::RecordNotExist
            | AppErrorCode::InvalidInput => {
                app_log_event!(logctx, AppLogLevel::WARNING, "table:{}, op:{}, {}", M::TABLE_LABEL, op, e);
            }
            _others => {
                app_log_event!(logctx, AppLogLevel::ERROR, "table:{}, op:{}, {}", M::TABLE_LABEL, op, e);
            }
        }
        e
    }

    fn rows_to_models(table: AppInMemFetchedSingleTable) -> DefaultResult<Vec<M>, AppError> {
        table
            .into_iter()
            .map(|(pkey, row)| {
                let key = M::Key::try_from_pkey(pkey.as_str())?;
                M::try_from_row(key, row)
            })
            .collect()
    }

    async fn save_common(&self, mut objs: Vec<M>, strict: bool) -> DefaultResult<Vec<M>, AppError> {
        if objs.is_empty() {
            return Ok(objs);
        }
        objs.iter_mut().for_each(M::normalize);
        objs.iter().try_for_each(M::validate)?;
        let given_keys = objs
            .iter()
            .filter_map(|o| o.key().map(|k| k.to_pkey()))
            .collect::<Vec<_>>();
        if strict {
            let mut uniq = HashSet::new();
            if let Some(dup) = given_keys.iter().find(|k| !uniq.insert(k.as_str())) {
                return Err(AppError {
                    code: AppErrorCode::ConstraintViolation,
                    detail: Some(format!("duplicate-in-batch, pkey:{dup}")),
                });
            }
        }
        let info = HashMap::from([
            (M::TABLE_LABEL.to_string(), given_keys),
            (
                SEQUENCE_TABLE_LABEL.to_string(),
                vec![M::TABLE_LABEL.to_string()],
            ),
        ]);
        let (mut fetched, lock) = self.datastore.fetch_acquire(info).await?;
        let existing = fetched.remove(M::TABLE_LABEL).unwrap_or_default();
        if strict {
            if let Some(pkey) = existing.keys().next() {
                return Err(AppError {
                    code: AppErrorCode::ConstraintViolation,
                    detail: Some(format!("pkey-exists:{pkey}")),
                });
            } // lock released on return
        }
        let seq_last = match fetched
            .remove(SEQUENCE_TABLE_LABEL)
            .and_then(|mut t| t.remove(M::TABLE_LABEL))
        {
            Some(mut row) => parse_column::<u64>(&mut row, 0, SEQUENCE_TABLE_LABEL)?,
            None => 0,
        };
        // identifiers given by callers are taken into account first, so
        // the generated ones never collide with them
        let mut seq_curr = objs
            .iter()
            .filter_map(|o| o.key().and_then(|k| k.sequence_num()))
            .fold(seq_last, u64::max);
        for obj in objs.iter_mut().filter(|o| o.key().is_none()) {
            let next = seq_curr.checked_add(1).ok_or_else(|| AppError {
                code: AppErrorCode::ExceedingMaxLimit,
                detail: Some(format!("id-sequence-exhausted, table:{}", M::TABLE_LABEL)),
            })?;
            let key = M::Key::from_sequence(next).ok_or(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some("key-required".to_string()),
            })?;
            obj.set_key(key);
            seq_curr = next;
        }
        let rows = objs
            .iter()
            .filter_map(|o| o.key().map(|k| (k.to_pkey(), o.to_row())))
            .collect::<AppInMemFetchedSingleTable>();
        let mut data = HashMap::from([(M::TABLE_LABEL.to_string(), rows)]);
        if seq_curr != seq_last {
            let seq_row = vec![seq_curr.to_string()];
            let seq_table = HashMap::from([(M::TABLE_LABEL.to_string(), seq_row)]);
            data.insert(SEQUENCE_TABLE_LABEL.to_string(), seq_table);
        }
        let _num_saved = self.datastore.save_release(data, lock)?;
        Ok(objs)
    } // end of fn save_common

    async fn fetch_common(&self, pkeys: Vec<String>) -> DefaultResult<Vec<M>, AppError> {
        let info = HashMap::from([(M::TABLE_LABEL.to_string(), pkeys)]);
        let mut fetched = self.datastore.fetch(info).await?;
        let table = fetched.remove(M::TABLE_LABEL).unwrap_or_default();
        Self::rows_to_models(table)
    }
} // end of impl InMemStore

#[async_trait]
impl<M> AbsRepository<M, M::Key> for InMemStore<M>
where
    M: AbsInMemRecord,
{
    async fn save(&self, obj: M) -> DefaultResult<M, AppError> {
        let mut saved = self
            .save_common(vec![obj], false)
            .await
            .map_err(|e| self.log_failure("save", e))?;
        saved.pop().ok_or(AppError {
            code: AppErrorCode::Unknown,
            detail: Some("save-returned-empty".to_string()),
        })
    }

    async fn save_all(&self, objs: Vec<M>) -> DefaultResult<Vec<M>, AppError> {
        self.save_common(objs, false)
            .await
            .map_err(|e| self.log_failure("save-all", e))
    }

    async fn insert(&self, obj: M) -> DefaultResult<M, AppError> {
        let mut saved = self
            .save_common(vec![obj], true)
            .await
            .map_err(|e| self.log_failure("insert", e))?;
        saved.pop().ok_or(AppError {
            code: AppErrorCode::Unknown,
            detail: Some("insert-returned-empty".to_string()),
        })
    }

    async fn find_by_id(&self, id: &M::Key) -> DefaultResult<Option<M>, AppError> {
        let mut found = self.fetch_common(vec![id.to_pkey()]).await?;
        Ok(found.pop())
    }

    async fn find_all_by_id(&self, ids: Vec<M::Key>) -> DefaultResult<Vec<M>, AppError> {
        let pkeys = ids.iter().map(AbsInMemKey::to_pkey).collect();
        self.fetch_common(pkeys).await
    }

    async fn find_all(&self) -> DefaultResult<Vec<M>, AppError> {
        let pkeys = self
            .datastore
            .filter_keys(M::TABLE_LABEL.to_string(), &AllRowsFilter)
            .await?;
        // rows removed between the two steps are simply skipped
        self.fetch_common(pkeys).await
    }

    async fn delete_by_id(&self, id: &M::Key) -> DefaultResult<(), AppError> {
        let pkey = id.to_pkey();
        let info = HashMap::from([(M::TABLE_LABEL.to_string(), vec![pkey.clone()])]);
        let (fetched, lock) = self.datastore.fetch_acquire(info.clone()).await?;
        let exists = fetched
            .get(M::TABLE_LABEL)
            .map(|t| t.contains_key(pkey.as_str()))
            .unwrap_or(false);
        if exists {
            let _num_deleted = self.datastore.delete_release(info, lock)?;
            Ok(())
        } else {
            drop(lock);
            let e = AppError {
                code: AppErrorCode::RecordNotExist,
                detail: Some(format!("pkey:{pkey}")),
            };
            Err(self.log_failure("delete", e))
        }
    }

    async fn count(&self) -> DefaultResult<usize, AppError> {
        self.datastore.num_rows(M::TABLE_LABEL).await
    }

    async fn exists_by_id(&self, id: &M::Key) -> DefaultResult<bool, AppError> {
        // only presence of the row key matters, rows are not decoded
        let pkey = id.to_pkey();
        let info = HashMap::from([(M::TABLE_LABEL.to_string(), vec![pkey.clone()])]);
        let fetched = self.datastore.fetch(info).await?;
        let found = fetched
            .get(M::TABLE_LABEL)
            .map(|t| t.contains_key(pkey.as_str()))
            .unwrap_or(false);
        Ok(found)
    }
} // end of impl AbsRepository for InMemStore
