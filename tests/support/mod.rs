#![allow(dead_code)]

use std::env;
use std::sync::Mutex;

use skyview::services::BatchRequest;

/// Every variable `ServerConfig::load` reads.
pub const CONFIG_VARS: [&str; 6] = [
    "SKYVIEW_CONFIG",
    "HOST",
    "PORT",
    "FRAME_TIMEOUT_MS",
    "SSE_KEEP_ALIVE_SECS",
    "FRAME_CACHE_CAPACITY",
];

/// Tests run in parallel but share one process environment.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with all config variables unset except those in `vars`.
/// The previous environment is restored afterwards, even on panic.
pub fn with_config_env<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _restore = EnvSnapshot::take();
    for name in CONFIG_VARS {
        env::remove_var(name);
    }
    for (name, value) in vars {
        env::set_var(name, value);
    }
    f()
}

struct EnvSnapshot(Vec<(&'static str, Option<String>)>);

impl EnvSnapshot {
    fn take() -> Self {
        Self(CONFIG_VARS.iter().map(|name| (*name, env::var(name).ok())).collect())
    }
}

impl Drop for EnvSnapshot {
    fn drop(&mut self) {
        for (name, value) in &self.0 {
            match value {
                Some(value) => env::set_var(name, value),
                None => env::remove_var(name),
            }
        }
    }
}

/// London, 2026-02-02, whole day.
pub fn london_request(frame_count: i64) -> BatchRequest {
    BatchRequest {
        latitude: 51.5,
        longitude: -0.1,
        elevation: 0.0,
        start_date: "2026-02-02".to_string(),
        start_time: "00:00:00".to_string(),
        end_date: "2026-02-02".to_string(),
        end_time: "23:59:59".to_string(),
        frame_count,
    }
}
