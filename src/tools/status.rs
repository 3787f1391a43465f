//! Service status
//!
//! Build, database and process information for `/api/status` and the
//! `status` MCP tool.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Runtime status of the calorie counter
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Lookup tiers in the order they are tried
    pub lookup_tiers: Vec<&'static str>,
    pub catalog_loaded_at: String,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Collects runtime information
#[derive(Debug, Clone)]
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    pub fn get_status(&self, lookup_tiers: Vec<&'static str>, catalog_loaded_at: &str) -> ServiceStatus {
        let build = BuildInfo::current();

        // SQLite in WAL mode keeps recent writes in the -wal file
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));
        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        ServiceStatus {
            name: build.name,
            version: build.version,
            build_number: build.build_number,
            build_timestamp: build.build_timestamp,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            lookup_tiers,
            catalog_loaded_at: catalog_loaded_at.to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
