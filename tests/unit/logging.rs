use std::env;
use std::fs::{remove_file, File};

use serde_json::{from_value as json_from_value, json};

use comercial::logging::{app_log_event, to_tracing_level, AppLogContext, AppLogLevel};
use comercial::{AppBasepathCfg, AppLoggingCfg};

#[test]
fn init_log_context_ok() {
    let sys_path = env::temp_dir().to_string_lossy().to_string();
    let basepath = AppBasepathCfg {
        system: sys_path.clone(),
        service: crate::ut_service_basepath(),
    };
    let log_file_path = "comercial/log/test/unit_test_init.log";
    let logger_keys = ["should-be-module-path", "another-module-hier"];
    let cfg = {
        let val = json!({
            "handlers" : [
                {"alias": "errlog-file-456", "min_level": "WARNING",
                 "path": log_file_path,  "destination": "localfs"},
                {"alias": "std-output-123",  "min_level": "ERROR",
                 "destination": "console"}
            ],
            "loggers" : [
                {"alias": logger_keys[0],
                 "handlers": ["errlog-file-456", "std-output-123"],
                 "level": "INFO"},
                {"alias": logger_keys[1],
                 "handlers": ["errlog-file-456"] }
            ]
        });
        json_from_value::<AppLoggingCfg>(val).unwrap()
    };
    let actual = AppLogContext::new(&basepath, &cfg);
    for key in logger_keys {
        let result = actual.get_assigner(key);
        assert!(result.is_some());
        let logger = result.unwrap();
        tracing::dispatcher::with_default(logger, || {
            const LVL: tracing::Level = to_tracing_level(&AppLogLevel::ERROR);
            tracing::event!(LVL, "invoked by unit test");
        });
    }
    assert!(actual.get_assigner("nonexist-module").is_none());
    {
        let fullpath = sys_path + "/" + log_file_path;
        let result = File::open(fullpath.clone());
        assert!(result.is_ok());
        drop(result.unwrap());
        let result = remove_file(fullpath);
        assert!(result.is_ok());
    }
} // end of init_log_context_ok

#[test]
fn log_event_without_assigner() {
    // no dispatcher registered for this module path, the event goes to
    // global default subscriber without panic
    let logctx = crate::ut_log_context();
    app_log_event!(logctx, AppLogLevel::WARNING, "unit test, value:{}", 123);
    assert!(logctx.get_assigner(module_path!()).is_none());
}

#[test]
fn level_mapping() {
    assert_eq!(to_tracing_level(&AppLogLevel::FATAL), tracing::Level::ERROR);
    assert_eq!(to_tracing_level(&AppLogLevel::WARNING), tracing::Level::WARN);
    assert_eq!(to_tracing_level(&AppLogLevel::TRACE), tracing::Level::TRACE);
}
