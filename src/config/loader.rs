//! Options file loading

use super::options::PluginOptions;
use crate::error::ReportError;
use crate::infra::{FileSystem, RealFileSystem};
use std::path::Path;

/// Options file looked up in the working directory when none is given
pub const OPTIONS_FILE_NAME: &str = ".build-report.toml";

/// Loads plugin options from JSON or TOML files
pub struct OptionsLoader;

impl OptionsLoader {
    /// Load options from `path`; the format follows the extension.
    ///
    /// `.toml` files are read as TOML, everything else as JSON. The parsed
    /// value goes through the same schema validation as in-memory options.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use build_report::config::OptionsLoader;
    /// use std::path::Path;
    ///
    /// let options = OptionsLoader::load(Path::new("build-report.json"))?;
    /// println!("verbose fonts: {}", options.verbose_fonts);
    /// # Ok::<(), build_report::error::ReportError>(())
    /// ```
    pub fn load(path: &Path) -> Result<PluginOptions, ReportError> {
        Self::load_with_fs(path, &RealFileSystem)
    }

    /// Load options with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(path: &Path, fs: &FS) -> Result<PluginOptions, ReportError> {
        log::debug!("Loading options from {}", path.display());

        let contents = fs.read_to_string(path).map_err(|source| ReportError::Io {
            context: format!("reading options file {}", path.display()),
            source,
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let value: serde_json::Value = if is_toml {
            toml_edit::de::from_str(&contents).map_err(|e| ReportError::OptionsParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            serde_json::from_str(&contents).map_err(|e| ReportError::OptionsParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        PluginOptions::from_value(&value)
    }

    /// Load [`OPTIONS_FILE_NAME`] from `dir`, or defaults if it is absent.
    pub fn discover(dir: &Path) -> Result<PluginOptions, ReportError> {
        Self::discover_with_fs(dir, &RealFileSystem)
    }

    /// Discover options with a custom filesystem implementation
    pub fn discover_with_fs<FS: FileSystem>(dir: &Path, fs: &FS) -> Result<PluginOptions, ReportError> {
        let path = dir.join(OPTIONS_FILE_NAME);
        if !fs.is_file(&path) {
            log::debug!("No {} in {}, using default options", OPTIONS_FILE_NAME, dir.display());
            return Ok(PluginOptions::default());
        }
        Self::load_with_fs(&path, fs)
    }
}
