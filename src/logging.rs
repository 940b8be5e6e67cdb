use std::collections::HashMap;
use std::io::stdout;
use std::path::Path;

use tracing::dispatcher::Dispatch;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

use crate::config::{AppBasepathCfg, AppLogHandlerCfg, AppLoggerCfg, AppLoggingCfg};
use crate::constant::logging::{Destination, Level};

pub type AppLogLevel = Level;

/// Map application log level to the level used by `tracing`, FATAL has no
/// counterpart and is reported as ERROR.
pub const fn to_tracing_level(lvl: &AppLogLevel) -> tracing::Level {
    match lvl {
        Level::FATAL | Level::ERROR => tracing::Level::ERROR,
        Level::WARNING => tracing::Level::WARN,
        Level::INFO => tracing::Level::INFO,
        Level::DEBUG => tracing::Level::DEBUG,
        Level::TRACE => tracing::Level::TRACE,
    }
}

// output destination of a handler, along with the least severe level
// it accepts
struct LogSink {
    writer: NonBlocking,
    min_level: tracing::Level,
}

/// Dispatchers of log events, keyed by module path of the callers, see
/// macro [`app_log_event`].
pub struct AppLogContext {
    dispatchers: HashMap<String, Dispatch>,
    // writer threads flush pending events until the guards are dropped
    _flush_guards: Vec<WorkerGuard>,
}

fn open_sink(basepath: &AppBasepathCfg, cfg: &AppLogHandlerCfg) -> Option<(LogSink, WorkerGuard)> {
    let (writer, guard) = match cfg.destination {
        Destination::CONSOLE => tracing_appender::non_blocking(stdout()),
        Destination::LOCALFS => {
            let relpath = cfg.path.as_deref()?.trim_start_matches('/');
            let fullpath = Path::new(basepath.system.as_str()).join(relpath);
            let appender = rolling::never(fullpath.parent()?, fullpath.file_name()?);
            tracing_appender::non_blocking(appender)
        }
    };
    let min_level = to_tracing_level(&cfg.min_level);
    Some((LogSink { writer, min_level }, guard))
}

fn build_dispatch(cfg: &AppLoggerCfg, sinks: &HashMap<&str, LogSink>) -> Dispatch {
    let override_lvl = cfg.level.as_ref().map(to_tracing_level);
    let layers = cfg
        .handlers
        .iter()
        .filter_map(|alias| sinks.get(alias.as_str()))
        .map(|sink| {
            let lvl = override_lvl.unwrap_or(sink.min_level);
            fmt::layer()
                .with_writer(sink.writer.clone())
                .with_target(true)
                .with_file(false)
                .with_line_number(true)
                .with_filter(LevelFilter::from_level(lvl))
        })
        .collect::<Vec<_>>();
    Dispatch::new(Registry::default().with(layers))
}

impl AppLogContext {
    pub fn new(basepath: &AppBasepathCfg, cfg: &AppLoggingCfg) -> Self {
        let mut guards = Vec::with_capacity(cfg.handlers.len());
        let mut sinks = HashMap::new();
        for h in cfg.handlers.iter() {
            if let Some((sink, guard)) = open_sink(basepath, h) {
                sinks.insert(h.alias.as_str(), sink);
                guards.push(guard);
            }
        }
        let dispatchers = cfg
            .loggers
            .iter()
            .map(|l| (l.alias.to_string(), build_dispatch(l, &sinks)))
            .collect();
        Self {
            dispatchers,
            _flush_guards: guards,
        }
    }

    pub fn get_assigner(&self, key: &str) -> Option<&Dispatch> {
        self.dispatchers.get(key)
    }
}

/// Emit an event through the dispatcher registered for the calling module,
/// or through the global default subscriber if there is none.
#[macro_export]
macro_rules! app_log_event {
    ( $ctx:expr, $lvl:expr, $($arg:tt)+ ) => {{
        const LVL: tracing::Level = $crate::logging::to_tracing_level(&$lvl);
        match $ctx.get_assigner(module_path!()) {
            Some(d) => tracing::dispatcher::with_default(d, || {
                tracing::event!(LVL, $($arg)+);
            }),
            None => {
                tracing::event!(LVL, $($arg)+);
            }
        }
    }};
}

pub use app_log_event;
