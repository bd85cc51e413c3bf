use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::RunMode;

pub const DEFAULT_PRIMARY_DIR: &str = "comparison/compare_input_1";
pub const DEFAULT_SECONDARY_DIR: &str = "comparison/compare_input_2";
pub const DEFAULT_OUTPUT_DIR: &str = "comparison";
pub const DEFAULT_PRIMARY_EXT: &str = "tif";
pub const DEFAULT_SECONDARY_EXT: &str = "tiff";
pub const DEFAULT_BINS: usize = 50;
pub const DEFAULT_DPI: u32 = 300;

/// Comparison parameters suitable for config files and CLI defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffParams {
    pub mode: RunMode,
    /// Directory scanned for primary rasters
    pub primary_dir: PathBuf,
    /// Directory holding the `<base>.<secondary_ext>` counterparts
    pub secondary_dir: PathBuf,
    /// Where report images are written
    pub output_dir: PathBuf,
    pub primary_ext: String,
    pub secondary_ext: String,
    /// Histogram bin count
    pub bins: usize,
    /// Output resolution in dots per inch
    pub dpi: u32,
}

impl Default for DiffParams {
    fn default() -> Self {
        Self {
            mode: RunMode::Individual,
            primary_dir: PathBuf::from(DEFAULT_PRIMARY_DIR),
            secondary_dir: PathBuf::from(DEFAULT_SECONDARY_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            primary_ext: DEFAULT_PRIMARY_EXT.to_string(),
            secondary_ext: DEFAULT_SECONDARY_EXT.to_string(),
            bins: DEFAULT_BINS,
            dpi: DEFAULT_DPI,
        }
    }
}

impl DiffParams {
    pub fn validate(&self) -> Result<()> {
        if self.bins == 0 {
            return Err(Error::InvalidArgument {
                arg: "bins",
                value: self.bins.to_string(),
            });
        }
        if self.dpi == 0 {
            return Err(Error::InvalidArgument {
                arg: "dpi",
                value: self.dpi.to_string(),
            });
        }
        if self.primary_ext.is_empty() {
            return Err(Error::InvalidArgument {
                arg: "primary_ext",
                value: String::new(),
            });
        }
        Ok(())
    }

    /// `<output_dir>/diff_distribution_<base>.png`
    pub fn pair_output_path(&self, base_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("diff_distribution_{}.png", base_name))
    }

    /// `<output_dir>/Overall_Diff_Distribution.png`
    pub fn overall_output_path(&self) -> PathBuf {
        self.output_dir.join("Overall_Diff_Distribution.png")
    }
}
