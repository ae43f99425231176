use crate::error::ConfigError;
use crate::upload::{UploadLimits, MAX_FILE_SIZE};
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Server configuration, built once at startup
///
/// Parsed from the command line:
///
/// ```text
/// csvview [host] [port] [--max-upload-bytes N] [--static-dir DIR]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: MAX_FILE_SIZE,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl Config {
    /// Parse arguments, excluding the program name
    ///
    /// # Examples
    /// ```
    /// use csvview::config::Config;
    ///
    /// let args = ["0.0.0.0", "9000", "--max-upload-bytes", "1024"].map(String::from);
    /// let config = Config::from_args(args).unwrap();
    /// assert_eq!(config.address(), "0.0.0.0:9000");
    /// assert_eq!(config.max_upload_bytes, 1024);
    /// ```
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut positional = 0;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--max-upload-bytes" => {
                    let value = args
                        .next()
                        .ok_or_else(|| ConfigError::MissingValue(arg.clone()))?;
                    config.max_upload_bytes =
                        value.parse().map_err(|_| ConfigError::InvalidValue {
                            flag: arg.clone(),
                            value: value.clone(),
                        })?;
                }
                "--static-dir" => {
                    let value = args
                        .next()
                        .ok_or_else(|| ConfigError::MissingValue(arg.clone()))?;
                    config.static_dir = PathBuf::from(value);
                }
                flag if flag.starts_with("--") => {
                    return Err(ConfigError::UnknownArgument(arg.clone()));
                }
                value => {
                    match positional {
                        0 => config.host = value.to_string(),
                        1 => {
                            config.port = value
                                .parse()
                                .map_err(|_| ConfigError::InvalidPort(value.to_string()))?
                        }
                        _ => return Err(ConfigError::UnknownArgument(value.to_string())),
                    }
                    positional += 1;
                }
            }
        }

        Ok(config)
    }

    /// `host:port` to bind the listener to
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn limits(&self) -> UploadLimits {
        UploadLimits {
            max_file_size: self.max_upload_bytes,
        }
    }
}
