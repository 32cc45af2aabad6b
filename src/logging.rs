//! `log` backend that writes to the browser console.
//!
//! Installed once from the module start function. Native builds never call
//! [`init`], so the `log` macros there are no-ops unless a test sets its own
//! logger.

use log::kv::{self, Source, VisitSource};
use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;
use web_sys::console;

/// Routes `log` records to `console.error/warn/info/debug`.
struct ConsoleLogger {
    level: LevelFilter,
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format_record(record);
        let message = JsValue::from_str(&line);
        match record.level() {
            Level::Error => console::error_1(&message),
            Level::Warn => console::warn_1(&message),
            Level::Info => console::info_1(&message),
            Level::Debug | Level::Trace => console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

/// Render a record as `[target] message key=value ...`.
fn format_record(record: &Record<'_>) -> String {
    struct KvCollector(String);

    impl<'kvs> VisitSource<'kvs> for KvCollector {
        fn visit_pair(
            &mut self,
            key: kv::Key<'kvs>,
            value: kv::Value<'kvs>,
        ) -> Result<(), kv::Error> {
            self.0.push_str(&format!(" {key}={value}"));
            Ok(())
        }
    }

    let mut kvs = KvCollector(String::new());
    let _ = Source::visit(record.key_values(), &mut kvs);
    format!("[{}] {}{}", record.target(), record.args(), kvs.0)
}

/// Install the console logger. Safe to call more than once; later calls are ignored.
pub fn init(level: LevelFilter) {
    static LOGGER: std::sync::OnceLock<ConsoleLogger> = std::sync::OnceLock::new();
    let logger = LOGGER.get_or_init(|| ConsoleLogger { level });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}
