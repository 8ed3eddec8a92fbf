mod file_config;

pub use file_config::{FileConfig, PaginationConfig};

use crate::catalog_store::DEFAULT_READ_POOL_SIZE;
use crate::pagination::{OffsetPaginationAdapter, DEFAULT_PER_PAGE, MAX_PER_PAGE};
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub bind_address: Option<String>,
    pub logging_level: RequestsLoggingLevel,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub port: u16,
    pub bind_address: String,
    pub logging_level: RequestsLoggingLevel,
    pub read_pool_size: usize,
    pub pagination: PaginationSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSettings {
    pub default_per_page: usize,
    pub max_per_page: usize,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: MAX_PER_PAGE,
        }
    }
}

impl PaginationSettings {
    pub fn adapter(&self) -> OffsetPaginationAdapter {
        OffsetPaginationAdapter::new(self.default_per_page, self.max_per_page)
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);
        let bind_address = file
            .bind_address
            .or_else(|| cli.bind_address.clone())
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let read_pool_size = file.read_pool_size.unwrap_or(DEFAULT_READ_POOL_SIZE);
        if read_pool_size == 0 {
            bail!("read_pool_size must be at least 1");
        }

        let pagination_file = file.pagination.unwrap_or_default();
        let pagination = PaginationSettings {
            default_per_page: pagination_file
                .default_per_page
                .unwrap_or(DEFAULT_PER_PAGE),
            max_per_page: pagination_file.max_per_page.unwrap_or(MAX_PER_PAGE),
        };
        if pagination.default_per_page == 0 || pagination.max_per_page == 0 {
            bail!("Pagination page sizes must be positive");
        }
        if pagination.default_per_page > pagination.max_per_page {
            bail!(
                "Pagination default_per_page ({}) exceeds max_per_page ({})",
                pagination.default_per_page,
                pagination.max_per_page
            );
        }

        Ok(Self {
            db_dir,
            port,
            bind_address,
            logging_level,
            read_pool_size,
            pagination,
        })
    }

    pub fn catalog_db_path(&self) -> PathBuf {
        self.db_dir.join("catalog.db")
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
