// ABOUTME: Shared option loading for commands that read the configuration file.
// ABOUTME: Picks the file, applies the selected target, and fixes the base directory for paths.

use std::path::{Path, PathBuf};

use ebdeploy::config::{Config, DeployOptions};
use ebdeploy::error::Result;

use crate::cli::ConfigArgs;

/// Load options for the selected target.
///
/// Returns the options and the directory relative paths in them resolve
/// against: the directory of an explicit `--config` file, otherwise `cwd`.
pub fn load_options(args: &ConfigArgs, cwd: &Path) -> Result<(DeployOptions, PathBuf)> {
    let (config, base_dir) = match &args.config {
        Some(path) => {
            let path = cwd.join(path);
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.to_path_buf());
            (Config::load(&path)?, base_dir)
        }
        None => (Config::discover(cwd)?, cwd.to_path_buf()),
    };

    let options = config.options_for(args.target.as_deref())?;
    Ok((options, base_dir))
}
