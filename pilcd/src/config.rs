use dotenv::var;
use serde::{Deserialize, Serialize};
use std::env::var_os;
use std::ffi::OsStr;
use std::path::Path;

/// Display geometry and banner settings, loaded from a JSON file.
///
/// The file path defaults to `pilcd.json` and can be overridden with the
/// `PILCD_CONFIG` environment variable.
#[derive(Serialize, Deserialize, Debug)]
pub struct Config {
    pub cols: usize,
    pub lines: usize,
    /// First display line; `{host}` expands to the hostname.
    pub banner: String,
}

impl Config {
    pub fn try_load() -> Option<Self> {
        let config_str = var_os("PILCD_CONFIG");
        let config_str: &OsStr = config_str.as_deref().unwrap_or(OsStr::new("pilcd.json"));
        let config_path = Path::new(config_str);
        if config_path.exists() {
            let file = std::fs::File::open(config_path).ok()?;
            let reader = std::io::BufReader::new(file);
            serde_json::from_reader(reader).ok()
        } else {
            None
        }
    }

    pub fn save(&self) -> std::io::Result<()> {
        let config_str = var("PILCD_CONFIG").unwrap_or_else(|_| "pilcd.json".to_string());
        let config_path = Path::new(&config_str);
        let file = std::fs::File::create(config_path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cols: 16,
            lines: 2,
            banner: "{host}".to_string(),
        }
    }
}
