//! Default process and runtime metrics.

use std::time::{Duration, Instant};

use chrono::Utc;
use metrics::{Key, KeyName, Level, Metadata, Recorder, SharedString, Unit};

static METADATA: Metadata<'static> =
    Metadata::new(module_path!(), Level::INFO, Some(module_path!()));

const START_TIME: &str = "process_start_time_seconds";
const UPTIME: &str = "process_uptime_seconds";
const RESIDENT_MEMORY: &str = "process_resident_memory_bytes";
const VIRTUAL_MEMORY: &str = "process_virtual_memory_bytes";
const OPEN_FDS: &str = "process_open_fds";
const THREADS: &str = "process_threads";
const RUNTIME_WORKERS: &str = "tokio_runtime_workers";
const RUNTIME_ALIVE_TASKS: &str = "tokio_runtime_alive_tasks";

/// Point-in-time resource usage of the current process.
///
/// Fields are `None` where the platform does not expose the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSnapshot {
    pub resident_memory_bytes: Option<u64>,
    pub virtual_memory_bytes: Option<u64>,
    pub threads: Option<u64>,
    pub open_fds: Option<u64>,
}

impl ProcessSnapshot {
    /// Reads the current process state from the operating system.
    #[cfg(target_os = "linux")]
    pub fn capture() -> Self {
        let mut snapshot = std::fs::read_to_string("/proc/self/status")
            .map(|status| Self::parse_status(&status))
            .unwrap_or_default();
        snapshot.open_fds = std::fs::read_dir("/proc/self/fd")
            .ok()
            .map(|entries| entries.count() as u64);
        snapshot
    }

    #[cfg(not(target_os = "linux"))]
    pub fn capture() -> Self {
        Self::default()
    }

    /// Parses the contents of a `/proc/<pid>/status` file.
    pub fn parse_status(status: &str) -> Self {
        let mut snapshot = Self::default();
        for line in status.lines() {
            let Some((field, value)) = line.split_once(':') else {
                continue;
            };
            match field {
                "VmRSS" => snapshot.resident_memory_bytes = parse_kib(value),
                "VmSize" => snapshot.virtual_memory_bytes = parse_kib(value),
                "Threads" => snapshot.threads = value.trim().parse().ok(),
                _ => {}
            }
        }
        snapshot
    }
}

fn parse_kib(value: &str) -> Option<u64> {
    let kib: u64 = value.trim().trim_end_matches("kB").trim().parse().ok()?;
    kib.checked_mul(1024)
}

/// Collects the default gauges every registry exposes.
///
/// Gauges are refreshed on each [`collect`](Self::collect) call, so a scrape
/// always sees the process state at the time of the scrape.
#[derive(Debug)]
pub struct ProcessCollector {
    started: Instant,
    start_time_seconds: f64,
}

impl ProcessCollector {
    /// Names of every metric this collector owns.
    pub const METRIC_NAMES: [&'static str; 8] = [
        START_TIME,
        UPTIME,
        RESIDENT_MEMORY,
        VIRTUAL_MEMORY,
        OPEN_FDS,
        THREADS,
        RUNTIME_WORKERS,
        RUNTIME_ALIVE_TASKS,
    ];

    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            start_time_seconds: Utc::now().timestamp_millis() as f64 / 1000.0,
        }
    }

    /// Time elapsed since the collector was created.
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Returns `true` if `name` belongs to a default metric.
    pub fn owns(name: &str) -> bool {
        Self::METRIC_NAMES.contains(&name)
    }

    /// Registers help text and units for the default metrics.
    pub fn describe<R: Recorder>(&self, recorder: &R) {
        let descriptions: [(&'static str, Unit, &'static str); 8] = [
            (
                START_TIME,
                Unit::Seconds,
                "Start time of the process since unix epoch in seconds",
            ),
            (UPTIME, Unit::Seconds, "Seconds since the process started"),
            (RESIDENT_MEMORY, Unit::Bytes, "Resident memory size in bytes"),
            (VIRTUAL_MEMORY, Unit::Bytes, "Virtual memory size in bytes"),
            (OPEN_FDS, Unit::Count, "Number of open file descriptors"),
            (THREADS, Unit::Count, "Number of OS threads in the process"),
            (
                RUNTIME_WORKERS,
                Unit::Count,
                "Number of worker threads used by the async runtime",
            ),
            (
                RUNTIME_ALIVE_TASKS,
                Unit::Count,
                "Number of tasks currently alive in the async runtime",
            ),
        ];
        for (name, unit, help) in descriptions {
            recorder.describe_gauge(KeyName::from(name), Some(unit), SharedString::from(help));
        }
    }

    /// Refreshes every default gauge on `recorder`.
    pub fn collect<R: Recorder>(&self, recorder: &R) {
        let set = |name: &'static str, value: f64| {
            recorder
                .register_gauge(&Key::from_static_name(name), &METADATA)
                .set(value);
        };

        set(START_TIME, self.start_time_seconds);
        set(UPTIME, self.uptime().as_secs_f64());

        let snapshot = ProcessSnapshot::capture();
        if let Some(bytes) = snapshot.resident_memory_bytes {
            set(RESIDENT_MEMORY, bytes as f64);
        }
        if let Some(bytes) = snapshot.virtual_memory_bytes {
            set(VIRTUAL_MEMORY, bytes as f64);
        }
        if let Some(fds) = snapshot.open_fds {
            set(OPEN_FDS, fds as f64);
        }
        if let Some(threads) = snapshot.threads {
            set(THREADS, threads as f64);
        }

        // Only available when collecting from inside a tokio runtime.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let runtime = handle.metrics();
            set(RUNTIME_WORKERS, runtime.num_workers() as f64);
            set(RUNTIME_ALIVE_TASKS, runtime.num_alive_tasks() as f64);
        }
    }
}

impl Default for ProcessCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str = "Name:\tdevops-demo-api\n\
                          State:\tS (sleeping)\n\
                          VmSize:\t  123456 kB\n\
                          VmRSS:\t    2048 kB\n\
                          Threads:\t9\n";

    #[test]
    fn parse_status_reads_memory_and_threads() {
        let snapshot = ProcessSnapshot::parse_status(STATUS);
        assert_eq!(snapshot.virtual_memory_bytes, Some(123_456 * 1024));
        assert_eq!(snapshot.resident_memory_bytes, Some(2048 * 1024));
        assert_eq!(snapshot.threads, Some(9));
        assert_eq!(snapshot.open_fds, None);
    }

    #[test]
    fn parse_status_ignores_garbage() {
        let snapshot = ProcessSnapshot::parse_status("VmRSS:\tlots kB\nnot a field\n");
        assert_eq!(snapshot, ProcessSnapshot::default());
    }

    #[test]
    fn parse_status_rejects_overflowing_sizes() {
        let status = format!("VmRSS:\t{} kB\nVmSize:\t4 kB\n", u64::MAX);
        let snapshot = ProcessSnapshot::parse_status(&status);
        assert_eq!(snapshot.resident_memory_bytes, None);
        assert_eq!(snapshot.virtual_memory_bytes, Some(4096));
    }

    #[test]
    fn uptime_is_monotonic() {
        let collector = ProcessCollector::new();
        let first = collector.uptime();
        std::thread::sleep(Duration::from_millis(5));
        assert!(collector.uptime() > first);
    }

    #[test]
    fn owns_default_metric_names() {
        assert!(ProcessCollector::owns("process_start_time_seconds"));
        assert!(ProcessCollector::owns("tokio_runtime_alive_tasks"));
        assert!(!ProcessCollector::owns("http_requests_total"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn capture_reports_live_process() {
        let snapshot = ProcessSnapshot::capture();
        assert!(snapshot.resident_memory_bytes.unwrap_or(0) > 0);
        assert!(snapshot.threads.unwrap_or(0) >= 1);
        assert!(snapshot.open_fds.unwrap_or(0) >= 1);
    }
}
