// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

#![allow(clippy::shadow_reuse)]

use std::{path::PathBuf, time::Duration};

use config::{Config, ConfigError};
use const_format::formatcp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use typed_builder::TypedBuilder;
use url::Url;

use crate::{
    report::ReportPaths,
    scrapers::{directory::DEFAULT_SELECT_ID, ScrapeOptions},
};

pub const DEFAULT_BASE_URL: &str = "https://www.immunize.org/vaccines/vis-translations/";
pub const DEFAULT_LANGUAGE_URL_TEMPLATE: &str = formatcp!("{}{{code}}/", DEFAULT_BASE_URL);
pub const DEFAULT_USER_AGENT: &str = formatcp!(
    "{}/{} (+{})",
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_VERSION"),
    env!("CARGO_PKG_REPOSITORY")
);
pub const DEFAULT_VALIDATION_REPORT: &str = "language_validation_report.csv";
pub const DEFAULT_CONSOLIDATED_REPORT: &str = "vis_translations_all_languages_validated.csv";
/// Base name of the optional settings file in the working directory,
/// e.g. `vis-scraper.yml`.
pub const DEFAULT_CONFIG_FILE: &str = "vis-scraper";
pub const ENV_PREFIX: &str = "VIS_SCRAPER";

const DEFAULT_RETRIES: u32 = 0;
const DEFAULT_TIMEOUT: u64 = 30_000;
const DEFAULT_TABLE_WAIT: u64 = 30_000;
const DEFAULT_WORKERS: usize = 1;
const DEFAULT_REQUEST_PERIOD: u64 = 250;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load the basic/low-level configuration data: {0}")]
    Config(#[from] ConfigError),
    #[error("The base URL '{0}' is invalid: {1}")]
    InvalidBaseUrl(String, #[source] url::ParseError),
    #[error("The language URL template '{0}' lacks the '{{code}}' placeholder")]
    MissingCodePlaceholder(String),
    #[error("The number of workers has to be at least 1")]
    NoWorkers,
}

/// Everything a run can be configured with.
#[derive(Serialize, Deserialize, Debug, Clone, TypedBuilder)]
pub struct Settings {
    /// URL of the index page listing all languages.
    #[builder(default = DEFAULT_BASE_URL.to_owned(), setter(into))]
    pub base_url: String,
    /// URL of a language page, with `{code}` as placeholder for the language code.
    #[builder(default = DEFAULT_LANGUAGE_URL_TEMPLATE.to_owned(), setter(into))]
    pub language_url_template: String,
    /// HTML id of the `select` element listing the languages.
    #[builder(default = DEFAULT_SELECT_ID.to_owned(), setter(into))]
    pub language_select_id: String,
    #[builder(default = DEFAULT_USER_AGENT.to_owned(), setter(into))]
    pub user_agent: String,
    /// Number of retries for a single page load.
    #[builder(default = DEFAULT_RETRIES)]
    pub retries: u32,
    /// Request timeout in milliseconds (ms)
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: u64,
    /// How long to wait for a table to appear on a page, in milliseconds (ms)
    #[builder(default = DEFAULT_TABLE_WAIT)]
    pub table_wait: u64,
    /// Maximum number of languages scraped at the same time.
    #[builder(default = DEFAULT_WORKERS)]
    pub workers: usize,
    /// Minimum time between two page loads, in milliseconds (ms);
    /// 0 disables rate limiting.
    #[builder(default = DEFAULT_REQUEST_PERIOD)]
    pub request_period: u64,
    /// Report languages with defective rows as partial.
    #[builder(default = false)]
    pub strict_status: bool,
    #[builder(default = DEFAULT_VALIDATION_REPORT.into(), setter(into))]
    pub validation_report: PathBuf,
    #[builder(default = DEFAULT_CONSOLIDATED_REPORT.into(), setter(into))]
    pub consolidated_report: PathBuf,
}

/// Values given on the command line, taking precedence over everything else.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub workers: Option<usize>,
    pub strict_status: Option<bool>,
    pub validation_report: Option<PathBuf>,
    pub consolidated_report: Option<PathBuf>,
}

impl Settings {
    /// Checks the values that deserialization can not.
    pub fn validate(self) -> Result<Self, SettingsError> {
        if let Err(err) = Url::parse(&self.base_url) {
            return Err(SettingsError::InvalidBaseUrl(self.base_url, err));
        }
        if !self.language_url_template.contains("{code}") {
            return Err(SettingsError::MissingCodePlaceholder(
                self.language_url_template,
            ));
        }
        if self.workers == 0 {
            return Err(SettingsError::NoWorkers);
        }
        Ok(self)
    }

    pub fn index_url(&self) -> Result<Url, SettingsError> {
        Url::parse(&self.base_url)
            .map_err(|err| SettingsError::InvalidBaseUrl(self.base_url.clone(), err))
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    #[must_use]
    pub const fn request_period(&self) -> Duration {
        Duration::from_millis(self.request_period)
    }

    #[must_use]
    pub fn scrape_options(&self) -> ScrapeOptions {
        ScrapeOptions::builder()
            .language_url_template(self.language_url_template.clone())
            .table_wait(Duration::from_millis(self.table_wait))
            .workers(self.workers)
            .strict_status(self.strict_status)
            .build()
    }

    #[must_use]
    pub fn report_paths(&self) -> ReportPaths {
        ReportPaths {
            validation: self.validation_report.clone(),
            consolidated: self.consolidated_report.clone(),
        }
    }
}

fn path_value(path: Option<&PathBuf>) -> Option<String> {
    path.map(|path| path.to_string_lossy().into_owned())
}

/// Loads the settings from (in increasing precedence)
/// the built-in defaults,
/// the settings file (`vis-scraper.{yml,toml,json,...}`, optional,
/// or the one given in `overrides`, required),
/// environment variables prefixed with `VIS_SCRAPER_`
/// and the command line `overrides`.
///
/// # Errors
///
/// - the config loader fails to build
/// - settings failed to load and deserialize
/// - the loaded values are invalid
pub fn load(overrides: &Overrides) -> Result<Settings, SettingsError> {
    let file_source = overrides.config_file.as_ref().map_or_else(
        || config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        |file| config::File::from(file.as_path()).required(true),
    );
    let settings_loader = Config::builder()
        .set_default("base_url", DEFAULT_BASE_URL)?
        .set_default("language_url_template", DEFAULT_LANGUAGE_URL_TEMPLATE)?
        .set_default("language_select_id", DEFAULT_SELECT_ID)?
        .set_default("user_agent", DEFAULT_USER_AGENT)?
        .set_default("retries", u64::from(DEFAULT_RETRIES))?
        .set_default("timeout", DEFAULT_TIMEOUT)?
        .set_default("table_wait", DEFAULT_TABLE_WAIT)?
        .set_default("workers", DEFAULT_WORKERS as u64)?
        .set_default("request_period", DEFAULT_REQUEST_PERIOD)?
        .set_default("strict_status", false)?
        .set_default("validation_report", DEFAULT_VALIDATION_REPORT)?
        .set_default("consolidated_report", DEFAULT_CONSOLIDATED_REPORT)?
        .add_source(file_source)
        // Eg.. `VIS_SCRAPER_WORKERS=4 vis-scraper` would set the `workers` key
        .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .set_override_option(
            "workers",
            overrides.workers.and_then(|w| u64::try_from(w).ok()),
        )?
        .set_override_option("strict_status", overrides.strict_status)?
        .set_override_option(
            "validation_report",
            path_value(overrides.validation_report.as_ref()),
        )?
        .set_override_option(
            "consolidated_report",
            path_value(overrides.consolidated_report.as_ref()),
        )?
        .build()?;

    let settings = settings_loader.try_deserialize::<Settings>()?;

    tracing::debug!("{settings:#?}");

    settings.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_points_below_base_url() {
        assert_eq!(
            DEFAULT_LANGUAGE_URL_TEMPLATE,
            "https://www.immunize.org/vaccines/vis-translations/{code}/"
        );
    }

    #[test]
    fn builder_defaults_are_valid() {
        let settings = Settings::builder().build().validate().unwrap();
        assert_eq!(settings.language_select_id, "attr-lang");
        assert_eq!(settings.retries, 0);
        let options = settings.scrape_options();
        assert_eq!(options.table_wait, Duration::from_secs(30));
        assert_eq!(options.workers, 1);
        assert_eq!(
            options.language_url("fr").unwrap().as_str(),
            "https://www.immunize.org/vaccines/vis-translations/fr/"
        );
    }

    #[test]
    fn template_needs_placeholder() {
        let err = Settings::builder()
            .language_url_template("https://example.org/vis/")
            .build()
            .validate()
            .unwrap_err();
        assert!(matches!(err, SettingsError::MissingCodePlaceholder(_)));
    }

    #[test]
    fn zero_workers_are_rejected() {
        let err = Settings::builder().workers(0).build().validate().unwrap_err();
        assert!(matches!(err, SettingsError::NoWorkers));
    }

    #[test]
    fn loads_file_and_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("custom.toml");
        std::fs::write(&file, "workers = 3\nstrict_status = true\ntable_wait = 500\n").unwrap();
        let settings = load(&Overrides {
            config_file: Some(file),
            workers: Some(2),
            validation_report: Some(PathBuf::from("out/validation.csv")),
            ..Overrides::default()
        })
        .unwrap();
        assert_eq!(settings.workers, 2);
        assert!(settings.strict_status);
        assert_eq!(settings.table_wait, 500);
        assert_eq!(settings.validation_report, PathBuf::from("out/validation.csv"));
        assert_eq!(
            settings.consolidated_report,
            PathBuf::from(DEFAULT_CONSOLIDATED_REPORT)
        );
    }

    #[test]
    fn missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&Overrides {
            config_file: Some(dir.path().join("nope.yml")),
            ..Overrides::default()
        })
        .unwrap_err();
        assert!(matches!(err, SettingsError::Config(_)));
    }

    #[test]
    fn loaded_and_built_defaults_agree() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("empty.toml");
        std::fs::write(&file, "").unwrap();
        let loaded = load(&Overrides {
            config_file: Some(file),
            ..Overrides::default()
        })
        .unwrap();
        let built = Settings::builder().build();
        assert_eq!(loaded.workers, DEFAULT_WORKERS);
        assert_eq!(built.workers, DEFAULT_WORKERS);
        assert_eq!(loaded.table_wait, built.table_wait);
        assert_eq!(loaded.request_period, built.request_period);
    }
}
