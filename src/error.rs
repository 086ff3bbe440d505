// Error handling for ROM loading and run configuration

use std::fmt;

/// Failure to obtain a usable ROM image.
#[derive(Debug)]
pub enum RomError {
    Io(std::io::Error),
    BadSize { actual: usize },
}

impl fmt::Display for RomError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RomError::Io(e) => write!(f, "Couldn't read ROM: {}", e),
            RomError::BadSize { actual } => write!(
                f,
                "ROM must be {} bytes in size, got {}",
                crate::rom::ROM_SIZE,
                actual
            ),
        }
    }
}

impl std::error::Error for RomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RomError::Io(e) => Some(e),
            RomError::BadSize { .. } => None,
        }
    }
}

impl From<std::io::Error> for RomError {
    fn from(error: std::io::Error) -> Self {
        RomError::Io(error)
    }
}

/// Invalid entry-point tables, config files or command-line values.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    /// Malformed line in a pointer-table file (1-based line number).
    Parse { line: usize, message: String },
    Toml(toml::de::Error),
    TableOutOfRange { offset: usize, count: usize },
    UnknownDialect(String),
    BadArgument(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Couldn't read configuration: {}", e),
            ConfigError::Parse { line, message } => {
                write!(f, "Pointer table file line {}: {}", line, message)
            }
            ConfigError::Toml(e) => write!(f, "Invalid config file: {}", e),
            ConfigError::TableOutOfRange { offset, count } => write!(
                f,
                "Code pointer table at {:#06x} with {} entries is out of range",
                offset, count
            ),
            ConfigError::UnknownDialect(name) => write!(f, "Unknown output dialect '{}'", name),
            ConfigError::BadArgument(msg) => write!(f, "Bad argument: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Toml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::Io(error)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(error: toml::de::Error) -> Self {
        ConfigError::Toml(error)
    }
}

/// Any fatal error of a disassembly run.
#[derive(Debug)]
pub enum Error {
    Rom(RomError),
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Rom(e) => write!(f, "{}", e),
            Error::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Rom(e) => Some(e),
            Error::Config(e) => Some(e),
        }
    }
}

impl From<RomError> for Error {
    fn from(error: RomError) -> Self {
        Error::Rom(error)
    }
}

impl From<ConfigError> for Error {
    fn from(error: ConfigError) -> Self {
        Error::Config(error)
    }
}
