//! Configuration structures for the school simulator
//!
//! This module contains the school configuration, its CLI and config-file
//! loaders, and the validation applied before the school is built.

use super::slot::DEFAULT_MAX_SLOT;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Attendance pacing defaults
pub mod pacing {
    /// Shortest simulated attendance per student, in milliseconds
    pub const MIN_DURATION_MS: u64 = 100;

    /// Width of the random window added on top of the minimum, in milliseconds
    pub const DURATION_SPREAD_MS: u64 = 1000;

    /// Longest attendance a configuration may ask for, in milliseconds
    pub const MAX_ATTENDANCE_MS: u64 = 3_600_000;
}

/// A class entry as written in configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassEntry {
    /// Class name, unique within the school
    pub name: String,
    /// Hour at which the class is held
    pub start_slot: u32,
}

impl ClassEntry {
    /// Create a class entry
    pub fn new(name: impl Into<String>, start_slot: u32) -> Self {
        Self { name: name.into(), start_slot }
    }
}

/// A student entry as written in configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentEntry {
    /// Student name
    pub name: String,
    /// Student age
    pub age: u32,
    /// Names of the classes this student is enrolled in
    pub classes: Vec<String>,
}

impl StudentEntry {
    /// Create a student entry
    pub fn new(name: impl Into<String>, age: u32, classes: &[&str]) -> Self {
        Self {
            name: name.into(),
            age,
            classes: classes.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Command line arguments structure
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "goat-school",
    version = "0.1.0",
    about = "Goat School Simulator - Ticks through the school day and simulates class attendance",
    long_about = "Advances a school through its hours one tick at a time. Each tick resolves the class held in the current hour, finds the enrolled students and simulates their attendance one after another.

EXAMPLES:
    # Run one full school day with the built-in roster
    goat-school

    # Run 20 ticks without real delays
    goat-school --ticks 20 --instant

    # Use a configuration file
    goat-school --config school.json

    # Generate configuration template
    goat-school --print-config > school.json

    # Validate configuration without running
    goat-school --config school.json --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Name of the school
    #[arg(long, help = "Name of the school")]
    pub school_name: Option<String>,

    /// Number of hours in the school day
    #[arg(
        long,
        help = "Number of hours in the school day",
        long_help = "Number of hours in the school day. The hour counter wraps from this value back to 1. Must be greater than 0. Default: 8"
    )]
    pub max_slot: Option<u32>,

    /// Number of ticks to run
    #[arg(long, help = "Number of ticks to run (default: 8)")]
    pub ticks: Option<usize>,

    /// Random seed for reproducible attendance durations
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Shortest attendance per student in milliseconds
    #[arg(long, help = "Minimum attendance duration per student in ms (default: 100)")]
    pub min_duration_ms: Option<u64>,

    /// Width of the random attendance window in milliseconds
    #[arg(long, help = "Random attendance window in ms added to the minimum (default: 1000)")]
    pub duration_spread_ms: Option<u64>,

    /// Skip real sleeping during attendance
    #[arg(long, help = "Simulate attendance without real delays")]
    pub instant: bool,

    /// Allow several classes to share a start hour
    #[arg(
        long,
        help = "Allow several classes to share a start hour",
        long_help = "Allow several classes to share a start hour. The class registered first wins when the hour is resolved."
    )]
    pub allow_shared_start_slots: bool,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Emit logs as JSON
    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    /// Directory for rolling log files
    #[arg(long, help = "Also write logs to daily rolling files in this directory")]
    pub log_dir: Option<String>,

    /// Dry run mode - validate configuration without running ticks
    #[arg(long, help = "Validate configuration without running the simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Name of the school
    pub school_name: Option<String>,
    /// Number of hours in the school day
    pub max_slot: Option<u32>,
    /// Classes offered by the school
    pub classes: Option<Vec<ClassEntry>>,
    /// Students enrolled in the school
    pub students: Option<Vec<StudentEntry>>,
    /// Shortest attendance per student in milliseconds
    pub min_duration_ms: Option<u64>,
    /// Width of the random attendance window in milliseconds
    pub duration_spread_ms: Option<u64>,
    /// Random seed for reproducible results
    pub seed: Option<u64>,
    /// Number of ticks to run
    pub ticks: Option<usize>,
    /// Skip real sleeping during attendance
    pub instant: Option<bool>,
    /// Allow several classes to share a start hour
    pub allow_shared_start_slots: Option<bool>,
}

/// Configuration for the school simulation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchoolConfig {
    /// Name of the school
    pub school_name: String,
    /// Number of hours in the school day
    pub max_slot: u32,
    /// Classes offered by the school, in registration order
    pub classes: Vec<ClassEntry>,
    /// Students enrolled in the school, in registration order
    pub students: Vec<StudentEntry>,
    /// Shortest attendance per student in milliseconds
    pub min_duration_ms: u64,
    /// Width of the random attendance window in milliseconds
    pub duration_spread_ms: u64,
    /// Random seed for reproducible results
    pub seed: Option<u64>,
    /// Number of ticks to run
    pub ticks: usize,
    /// Skip real sleeping during attendance
    pub instant: bool,
    /// Allow several classes to share a start hour
    pub allow_shared_start_slots: bool,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for school configuration
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigValidationError {
    /// School name is empty
    #[error("School name must not be empty")]
    EmptySchoolName,

    /// Day length is invalid
    #[error("max_slot must be greater than 0, got {0}")]
    InvalidMaxSlot(u32),

    /// Tick count is invalid
    #[error("Tick count must be greater than 0, got {0}")]
    InvalidTickCount(usize),

    /// Random duration window is empty
    #[error("duration_spread_ms must be greater than 0, got {0}")]
    InvalidDurationSpread(u64),

    /// Longest possible attendance is beyond the allowed maximum
    #[error("duration window {min_ms} + {spread_ms} ms exceeds the maximum of {max_ms} ms")]
    DurationWindowTooLong {
        /// Configured minimum
        min_ms: u64,
        /// Configured spread
        spread_ms: u64,
        /// Allowed maximum
        max_ms: u64,
    },

    /// A class is scheduled outside the school day
    #[error("Class '{name}' starts at hour {start_slot}, outside 1..={max_slot}")]
    ClassOutOfRange {
        /// Class name
        name: String,
        /// Configured start hour
        start_slot: u32,
        /// Number of hours in the day
        max_slot: u32,
    },

    /// A class name is registered twice
    #[error("Class '{0}' is defined more than once")]
    DuplicateClassName(String),

    /// Two classes share a start hour
    #[error("Classes '{first}' and '{second}' both start at hour {start_slot}")]
    SharedStartSlot {
        /// Class registered first
        first: String,
        /// Class registered later
        second: String,
        /// Shared hour
        start_slot: u32,
    },
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            school_name: "Kid Valley High".to_string(),
            max_slot: DEFAULT_MAX_SLOT,
            classes: vec![
                ClassEntry::new("History", 1),
                ClassEntry::new("Biology", 2),
                ClassEntry::new("Jumping", 5),
                ClassEntry::new("Bleating", 7),
            ],
            students: vec![
                StudentEntry::new("Billy", 5, &["History", "Biology"]),
                StudentEntry::new("Vincent van Goat", 6, &["History", "Jumping"]),
                StudentEntry::new("Scape", 4, &["Bleating", "Jumping"]),
                StudentEntry::new("Daisy", 5, &["Bleating", "Biology"]),
            ],
            min_duration_ms: pacing::MIN_DURATION_MS,
            duration_spread_ms: pacing::DURATION_SPREAD_MS,
            seed: None,
            ticks: DEFAULT_MAX_SLOT as usize,
            instant: false,
            allow_shared_start_slots: false,
        }
    }
}

impl SchoolConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // CLI takes precedence over the file
        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            school_name: config_file.school_name.unwrap_or(defaults.school_name),
            max_slot: config_file.max_slot.unwrap_or(defaults.max_slot),
            classes: config_file.classes.unwrap_or(defaults.classes),
            students: config_file.students.unwrap_or(defaults.students),
            min_duration_ms: config_file.min_duration_ms.unwrap_or(defaults.min_duration_ms),
            duration_spread_ms: config_file
                .duration_spread_ms
                .unwrap_or(defaults.duration_spread_ms),
            seed: config_file.seed.or(defaults.seed),
            ticks: config_file.ticks.unwrap_or(defaults.ticks),
            instant: config_file.instant.unwrap_or(defaults.instant),
            allow_shared_start_slots: config_file
                .allow_shared_start_slots
                .unwrap_or(defaults.allow_shared_start_slots),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.school_name {
            config.school_name = value;
        }
        if let Some(value) = args.max_slot {
            config.max_slot = value;
        }
        if let Some(value) = args.ticks {
            config.ticks = value;
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
        if let Some(value) = args.min_duration_ms {
            config.min_duration_ms = value;
        }
        if let Some(value) = args.duration_spread_ms {
            config.duration_spread_ms = value;
        }

        // Flags can only switch behavior on
        if args.instant {
            config.instant = true;
        }
        if args.allow_shared_start_slots {
            config.allow_shared_start_slots = true;
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.school_name.trim().is_empty() {
            return Err(ConfigValidationError::EmptySchoolName);
        }

        if self.max_slot == 0 {
            return Err(ConfigValidationError::InvalidMaxSlot(self.max_slot));
        }

        if self.ticks == 0 {
            return Err(ConfigValidationError::InvalidTickCount(self.ticks));
        }

        if self.duration_spread_ms == 0 {
            return Err(ConfigValidationError::InvalidDurationSpread(self.duration_spread_ms));
        }

        match self.min_duration_ms.checked_add(self.duration_spread_ms) {
            Some(longest) if longest <= pacing::MAX_ATTENDANCE_MS => {}
            _ => {
                return Err(ConfigValidationError::DurationWindowTooLong {
                    min_ms: self.min_duration_ms,
                    spread_ms: self.duration_spread_ms,
                    max_ms: pacing::MAX_ATTENDANCE_MS,
                });
            }
        }

        let mut names = HashSet::new();
        let mut slots: HashMap<u32, &str> = HashMap::new();
        for class in &self.classes {
            if class.start_slot == 0 || class.start_slot > self.max_slot {
                return Err(ConfigValidationError::ClassOutOfRange {
                    name: class.name.clone(),
                    start_slot: class.start_slot,
                    max_slot: self.max_slot,
                });
            }

            if !names.insert(class.name.as_str()) {
                return Err(ConfigValidationError::DuplicateClassName(class.name.clone()));
            }

            if let Some(first) = slots.get(&class.start_slot) {
                if !self.allow_shared_start_slots {
                    return Err(ConfigValidationError::SharedStartSlot {
                        first: first.to_string(),
                        second: class.name.clone(),
                        start_slot: class.start_slot,
                    });
                }
            } else {
                slots.insert(class.start_slot, class.name.as_str());
            }
        }

        Ok(())
    }

    /// Get the attendance duration window as `(min, spread)` in milliseconds
    pub fn duration_window_ms(&self) -> (u64, u64) {
        (self.min_duration_ms, self.duration_spread_ms)
    }

    /// Hours in the day with no class scheduled
    pub fn empty_slots(&self) -> Vec<u32> {
        (1..=self.max_slot)
            .filter(|slot| !self.classes.iter().any(|c| c.start_slot == *slot))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_args() -> CliArgs {
        CliArgs::default()
    }

    #[test]
    fn test_school_config_default() {
        let config = SchoolConfig::default();

        assert_eq!(config.school_name, "Kid Valley High");
        assert_eq!(config.max_slot, 8);
        assert_eq!(config.classes.len(), 4);
        assert_eq!(config.students.len(), 4);
        assert_eq!(config.min_duration_ms, 100);
        assert_eq!(config.duration_spread_ms, 1000);
        assert!(config.seed.is_none());
        assert_eq!(config.ticks, 8);
        assert!(!config.instant);
        assert!(!config.allow_shared_start_slots);
    }

    #[test]
    fn test_default_bootstrap_roster() {
        let config = SchoolConfig::default();
        let classes: Vec<(&str, u32)> =
            config.classes.iter().map(|c| (c.name.as_str(), c.start_slot)).collect();
        assert_eq!(
            classes,
            vec![("History", 1), ("Biology", 2), ("Jumping", 5), ("Bleating", 7)]
        );
        assert_eq!(config.students[1].name, "Vincent van Goat");
        assert_eq!(config.students[1].classes, vec!["History", "Jumping"]);
    }

    #[test]
    fn test_default_config_is_valid() {
        SchoolConfig::default().validate().unwrap();
    }

    #[test]
    fn test_ticks_cli_parsing() {
        let cli_args = CliArgs::try_parse_from(vec!["test", "--ticks", "5"]).unwrap();
        assert_eq!(cli_args.ticks, Some(5));

        let cli_args = CliArgs::try_parse_from(vec!["test"]).unwrap();
        assert_eq!(cli_args.ticks, None);
    }

    #[test]
    fn test_config_file_loading() {
        use std::io::Write;
        use tempfile::Builder;

        let mut temp_file = Builder::new().suffix(".json").tempfile().unwrap();
        let config_json = r#"{
            "school_name": "Billy Goat Academy",
            "max_slot": 4,
            "classes": [
                { "name": "Grazing", "start_slot": 2 }
            ],
            "students": [
                { "name": "Nanny", "age": 3, "classes": ["Grazing"] }
            ],
            "seed": 12345,
            "ticks": 4
        }"#;

        temp_file.write_all(config_json.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = SchoolConfig::from_file(temp_file.path()).unwrap();

        assert_eq!(config.school_name, "Billy Goat Academy");
        assert_eq!(config.max_slot, 4);
        assert_eq!(config.classes, vec![ClassEntry::new("Grazing", 2)]);
        assert_eq!(config.students[0].name, "Nanny");
        assert_eq!(config.seed, Some(12345));
        assert_eq!(config.ticks, 4);
        // Missing keys fall back to defaults
        assert_eq!(config.min_duration_ms, 100);
        assert_eq!(config.duration_spread_ms, 1000);
    }

    #[test]
    fn test_config_file_missing() {
        let result = SchoolConfig::from_file("/definitely/not/here.json");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_config_file_unsupported_extension() {
        let temp_file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let result = SchoolConfig::from_file(temp_file.path());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(ext)) if ext == "yaml"));
    }

    #[test]
    fn test_cli_overrides() {
        let args = CliArgs {
            school_name: Some("Hill School".to_string()),
            max_slot: Some(10),
            ticks: Some(3),
            seed: Some(54321),
            instant: true,
            ..bare_args()
        };

        let config = SchoolConfig::from_cli_args(args).unwrap();

        assert_eq!(config.school_name, "Hill School");
        assert_eq!(config.max_slot, 10);
        assert_eq!(config.ticks, 3);
        assert_eq!(config.seed, Some(54321));
        assert!(config.instant);
        // Default values should remain for non-overridden fields
        assert_eq!(config.min_duration_ms, 100);
        assert_eq!(config.classes.len(), 4);
    }

    #[test]
    fn test_validation_empty_name() {
        let config = SchoolConfig { school_name: "  ".to_string(), ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptySchoolName));
    }

    #[test]
    fn test_validation_zero_counts() {
        let config = SchoolConfig { max_slot: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidMaxSlot(0)));

        let config = SchoolConfig { ticks: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidTickCount(0)));

        let config = SchoolConfig { duration_spread_ms: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidDurationSpread(0)));
    }

    #[test]
    fn test_validation_duration_window_bounds() {
        let config =
            SchoolConfig { min_duration_ms: u64::MAX, duration_spread_ms: 1, ..Default::default() };
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::DurationWindowTooLong {
                min_ms: u64::MAX,
                spread_ms: 1,
                max_ms: pacing::MAX_ATTENDANCE_MS,
            })
        );

        let config = SchoolConfig {
            min_duration_ms: pacing::MAX_ATTENDANCE_MS,
            duration_spread_ms: 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::DurationWindowTooLong { .. })
        ));

        let config = SchoolConfig {
            min_duration_ms: pacing::MAX_ATTENDANCE_MS - 1,
            duration_spread_ms: 1,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_class_out_of_range() {
        let config = SchoolConfig { max_slot: 6, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::ClassOutOfRange { ref name, start_slot: 7, max_slot: 6 })
                if name == "Bleating"
        ));
    }

    #[test]
    fn test_validation_duplicate_class_name() {
        let mut config = SchoolConfig::default();
        config.classes.push(ClassEntry::new("History", 3));
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::DuplicateClassName("History".to_string()))
        );
    }

    #[test]
    fn test_validation_shared_start_slot() {
        let mut config = SchoolConfig::default();
        config.classes.push(ClassEntry::new("Headbutting", 5));
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::SharedStartSlot {
                first: "Jumping".to_string(),
                second: "Headbutting".to_string(),
                start_slot: 5,
            })
        );

        config.allow_shared_start_slots = true;
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_slots() {
        let config = SchoolConfig::default();
        assert_eq!(config.empty_slots(), vec![3, 4, 6, 8]);
    }

    #[test]
    fn test_school_config_serialization() {
        let config = SchoolConfig::default();
        let json = config.print_json().unwrap();
        let parsed: SchoolConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
