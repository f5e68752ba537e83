//! Structured run report for downstream tool consumption.
//!
//! Written as JSON alongside the VCF output: what was read, where it went,
//! which separators were used, and the serialization counters.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::writer::{SerializeSummary, Separators};

/// Complete report of a serialization run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Tool version
    pub version: String,
    /// Timestamp of run (RFC 3339)
    pub timestamp: String,
    pub input: String,
    pub output: String,
    pub separators: Separators,
    pub threads: usize,
    pub statistics: SerializeSummary,
}

impl RunReport {
    pub fn new(
        input: &Path,
        output: &Path,
        separators: Separators,
        threads: usize,
        statistics: SerializeSummary,
    ) -> Self {
        let timestamp = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string());

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp,
            input: input.display().to_string(),
            output: output.display().to_string(),
            separators,
            threads,
            statistics,
        }
    }

    /// Path of the report for an output file: `out.vcf` -> `out_report.json`.
    pub fn path_for(output_path: &Path) -> PathBuf {
        let name = output_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy();
        let name: &str = &name;
        let name = name.strip_suffix(".gz").unwrap_or(name);
        let stem = name.strip_suffix(".vcf").unwrap_or(name);
        output_path.with_file_name(format!("{stem}_report.json"))
    }

    /// Write the report as JSON next to `output_path`.
    pub fn write(&self, output_path: &Path) -> std::io::Result<PathBuf> {
        let report_path = Self::path_for(output_path);
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&report_path, json)?;
        tracing::info!("Wrote run report to {}", report_path.display());
        Ok(report_path)
    }
}
