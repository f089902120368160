//! Log output for `rr-rank`. Result tables own stdout, so every log line
//! goes to stderr or, with `RR_LOG_DIR`, to a daily file.

use std::any::Any;
use std::panic;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// `RR_LOG_*` settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    /// `RR_LOG_DIR`: directory for `<app>.log`, rotated daily.
    pub dir: Option<PathBuf>,
    /// `RR_LOG_INCLUDE_BACKTRACE`: also run the default panic hook.
    pub include_backtrace: bool,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            dir: lookup("RR_LOG_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            include_backtrace: lookup("RR_LOG_INCLUDE_BACKTRACE")
                .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}

/// A panic mid-run is logged as one `error!` event tagged with the run id,
/// so it lands in the same log file as the run's other events.
pub fn install_tracing_panic_hook(app_name: &'static str) {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        let default_hook = panic::take_hook();
        let include_backtrace = LogSettings::from_env().include_backtrace;

        panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()));
            let thread = std::thread::current();

            tracing::error!(
                application = app_name,
                run_id = crate::run_id::get(),
                thread_name = thread.name().unwrap_or("unknown"),
                location = location.as_deref().unwrap_or("unknown"),
                panic_message = %panic_message(info.payload()),
                "rank run panicked"
            );

            if include_backtrace {
                default_hook(info);
            }
        }));
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn file_writer(app_name: &str, settings: &LogSettings) -> Option<BoxMakeWriter> {
    let dir = settings.dir.as_ref()?;
    if let Err(err) = std::fs::create_dir_all(dir) {
        // no subscriber yet
        eprintln!("cannot create RR_LOG_DIR {}: {err}; logging to stderr", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(BoxMakeWriter::new(non_blocking))
}

/// Filter from `RUST_LOG`, `info` when unset.
pub fn init_tracing_subscriber(app_name: &'static str) {
    let settings = LogSettings::from_env();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    match file_writer(app_name, &settings) {
        Some(writer) => {
            let _ = builder.with_ansi(false).with_writer(writer).try_init();
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
}
