mod logging;

use std::env;
use std::sync::Arc;

use comercial::constant::hard_limit;
use comercial::logging::AppLogContext;
use comercial::{
    AppBasepathCfg, AppCfgHardLimit, AppConfig, AppLoggingCfg, AppSharedState,
};

pub(crate) const EXAMPLE_REL_PATH: &str = "/tests/unit/examples/";

pub(crate) fn ut_service_basepath() -> String {
    env!("CARGO_MANIFEST_DIR").to_string()
}

pub(crate) fn ut_hard_limit() -> AppCfgHardLimit {
    AppCfgHardLimit {
        nitems_per_inmem_table: hard_limit::MAX_ITEMS_STORED_PER_MODEL,
    }
}

// log context without any logger, events fall back to global subscriber
pub(crate) fn ut_log_context() -> Arc<AppLogContext> {
    let basepath = AppBasepathCfg {
        system: env::temp_dir().to_string_lossy().to_string(),
        service: ut_service_basepath(),
    };
    let cfg = AppLoggingCfg {
        handlers: Vec::new(),
        loggers: Vec::new(),
    };
    Arc::new(AppLogContext::new(&basepath, &cfg))
}

pub(crate) fn ut_setup_share_state(cfg_fname: &str) -> AppSharedState {
    let service_basepath = ut_service_basepath();
    let sys_basepath = env::temp_dir().to_string_lossy().to_string();
    let fullpath = service_basepath.clone() + EXAMPLE_REL_PATH + cfg_fname;
    let cfg = AppConfig {
        store: AppConfig::parse_from_file(fullpath, ut_hard_limit()).unwrap(),
        basepath: AppBasepathCfg {
            system: sys_basepath,
            service: service_basepath,
        },
    };
    let logctx = AppLogContext::new(&cfg.basepath, &cfg.store.logging);
    AppSharedState::new(cfg, logctx)
}
