use std::collections::hash_map::RandomState;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::result::Result as DefaultResult;

use serde::de::Error as DeserializeError;
use serde::{Deserialize, Deserializer};

use crate::constant::{env_vars, logging as const_log};
use crate::error::{AppError, AppErrorCode};
use crate::AppLogAlias;

#[derive(Deserialize)]
pub struct AppLogHandlerCfg {
    pub min_level: const_log::Level,
    pub destination: const_log::Destination,
    pub alias: AppLogAlias,
    pub path: Option<String>,
}

#[derive(Deserialize)]
pub struct AppLoggerCfg {
    pub alias: AppLogAlias,
    pub handlers: Vec<String>,
    pub level: Option<const_log::Level>,
}

#[derive(Deserialize)]
pub struct AppLoggingCfg {
    pub handlers: Vec<AppLogHandlerCfg>,
    pub loggers: Vec<AppLoggerCfg>,
}

/// capacity of each table is bounded by `max_items`
#[derive(Deserialize, Debug)]
pub struct AppInMemoryDbCfg {
    #[serde(deserialize_with = "deny_blank_alias")]
    pub alias: String,
    pub max_items: u32,
}

#[derive(Deserialize)]
#[serde(tag = "_type")]
pub enum AppDataStoreCfg {
    InMemory(AppInMemoryDbCfg),
}

/// Settings of the store library, loaded from a JSON file
#[derive(Deserialize)]
pub struct AppStoreCfg {
    pub logging: AppLoggingCfg,
    pub data_store: Vec<AppDataStoreCfg>,
}

pub struct AppBasepathCfg {
    pub system: String,
    pub service: String,
}

pub struct AppConfig {
    pub basepath: AppBasepathCfg,
    pub store: AppStoreCfg,
}

pub struct AppCfgHardLimit {
    pub nitems_per_inmem_table: u32,
}

pub struct AppCfgInitArgs {
    pub env_var_map: HashMap<String, String, RandomState>,
    pub limit: AppCfgHardLimit,
}

fn deny_blank_alias<'de, D>(raw: D) -> DefaultResult<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(raw)?;
    if s.trim().is_empty() {
        Err(D::Error::custom("datastore alias must not be blank"))
    } else {
        Ok(s)
    }
}

fn take_env_path(
    map: &mut HashMap<String, String>,
    key: &str,
    code: AppErrorCode,
) -> DefaultResult<String, AppError> {
    map.remove(key)
        .map(|p| if p.ends_with('/') { p } else { p + "/" })
        .ok_or(AppError { code, detail: Some(key.to_string()) })
}

impl AppConfig {
    pub fn new(args: AppCfgInitArgs) -> DefaultResult<Self, AppError> {
        let AppCfgInitArgs { mut env_var_map, limit } = args;
        let m = &mut env_var_map;
        let system = take_env_path(m, env_vars::SYS_BASEPATH, AppErrorCode::MissingSysBasePath)?;
        let service =
            take_env_path(m, env_vars::SERVICE_BASEPATH, AppErrorCode::MissingAppBasePath)?;
        let cfg_path = m.remove(env_vars::CFG_FILEPATH).ok_or(AppError {
            code: AppErrorCode::MissingConfigPath,
            detail: Some(env_vars::CFG_FILEPATH.to_string()),
        })?;
        let store = Self::parse_from_file(format!("{service}{cfg_path}"), limit)?;
        Ok(Self {
            basepath: AppBasepathCfg { system, service },
            store,
        })
    }

    pub fn parse_from_file(
        filepath: String,
        limit: AppCfgHardLimit,
    ) -> DefaultResult<AppStoreCfg, AppError> {
        let file = File::open(filepath).map_err(|e| AppError {
            code: AppErrorCode::IOerror(e.kind()),
            detail: Some(e.to_string()),
        })?;
        let store: AppStoreCfg =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| AppError {
                code: AppErrorCode::InvalidJsonFormat,
                detail: Some(e.to_string()),
            })?;
        store.validate(&limit)?;
        Ok(store)
    }
} // end of impl AppConfig

impl AppStoreCfg {
    fn validate(&self, limit: &AppCfgHardLimit) -> DefaultResult<(), AppError> {
        self.logging.validate()?;
        if self.data_store.is_empty() {
            return Err(AppError {
                code: AppErrorCode::NoDatabaseCfg,
                detail: None,
            });
        }
        self.data_store.iter().try_for_each(|d| d.validate(limit))
    }
}

impl AppDataStoreCfg {
    fn validate(&self, limit: &AppCfgHardLimit) -> DefaultResult<(), AppError> {
        match self {
            Self::InMemory(c) => {
                let bound = limit.nitems_per_inmem_table;
                if c.max_items == 0 || c.max_items > bound {
                    Err(AppError {
                        code: AppErrorCode::ExceedingMaxLimit,
                        detail: Some(format!(
                            "alias:{}, max_items:{}, limit:{}",
                            c.alias, c.max_items, bound
                        )),
                    })
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl AppLogHandlerCfg {
    fn validate(&self) -> DefaultResult<(), AppError> {
        if self.alias.is_empty() {
            return Err(AppError {
                code: AppErrorCode::MissingAliasLogHdlerCfg,
                detail: None,
            });
        }
        match (&self.destination, &self.path) {
            (const_log::Destination::LOCALFS, None) => Err(AppError {
                code: AppErrorCode::InvalidHandlerLoggerCfg,
                detail: Some(format!("handler:{}, reason:file-path-missing", self.alias)),
            }),
            _others => Ok(()),
        }
    }
}

impl AppLoggerCfg {
    fn validate(&self, known_handlers: &HashSet<&str>) -> DefaultResult<(), AppError> {
        if self.alias.is_empty() {
            return Err(AppError {
                code: AppErrorCode::MissingAliasLoggerCfg,
                detail: None,
            });
        }
        if self.handlers.is_empty() {
            return Err(AppError {
                code: AppErrorCode::NoHandlerInLoggerCfg,
                detail: Some(format!("logger:{}", self.alias)),
            });
        }
        match self.handlers.iter().find(|h| !known_handlers.contains(h.as_str())) {
            Some(h) => Err(AppError {
                code: AppErrorCode::InvalidHandlerLoggerCfg,
                detail: Some(format!("logger:{}, unknown-handler:{h}", self.alias)),
            }),
            None => Ok(()),
        }
    }
}

impl AppLoggingCfg {
    // handlers are checked first, so loggers only refer to valid ones
    fn validate(&self) -> DefaultResult<(), AppError> {
        let missing = if self.handlers.is_empty() {
            Some(AppErrorCode::NoLogHandlerCfg)
        } else if self.loggers.is_empty() {
            Some(AppErrorCode::NoLoggerCfg)
        } else {
            None
        };
        if let Some(code) = missing {
            return Err(AppError { code, detail: None });
        }
        self.handlers.iter().try_for_each(AppLogHandlerCfg::validate)?;
        let known = self
            .handlers
            .iter()
            .map(|h| h.alias.as_str())
            .collect::<HashSet<_>>();
        self.loggers.iter().try_for_each(|l| l.validate(&known))
    }
}
