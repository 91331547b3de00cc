//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "artico3.toml";

/// Loads and validates an `artico3.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE))
}

/// Loads and validates the configuration file at `path`, whatever its name.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates an `artico3.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Walks up from `start` looking for the nearest directory containing `artico3.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, ConfigError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(ConfigError::ProjectNotFound(start.display().to_string()));
        }
    }
}

/// Validates that required fields are present and cross references resolve.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.implementation.board.is_empty() {
        return Err(ConfigError::MissingField("impl.board".to_string()));
    }

    let mut kernel_names = HashSet::new();
    for kernel in &config.kernels {
        if kernel.name.is_empty() {
            return Err(ConfigError::MissingField("kernels.name".to_string()));
        }
        // Kernel names become lowercase directory and core names.
        if !kernel_names.insert(kernel.name.to_lowercase()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate kernel '{}'",
                kernel.name
            )));
        }
    }

    let mut slot_ids = HashSet::new();
    for slot in &config.slots {
        if slot.id >= config.shuffler.slots {
            return Err(ConfigError::ValidationError(format!(
                "slot {} out of range (shuffler has {} slots)",
                slot.id, config.shuffler.slots
            )));
        }
        if !slot_ids.insert(slot.id) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate slot {}",
                slot.id
            )));
        }
        if let Some(unknown) = slot
            .kernels
            .iter()
            .find(|name| !config.kernels.iter().any(|k| &k.name == *name))
        {
            return Err(ConfigError::ValidationError(format!(
                "slot {} references unknown kernel '{unknown}'",
                slot.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMPL: &str = r#"
[impl]
repo = "/opt/artico3"
part = "xc7z020clg400-1"
board = ["zybo"]
design = "default"
os = "linux"
tool = "vivado"
tool_version = "2022.2"
"#;

    fn with_project(body: &str) -> String {
        format!("[project]\nname = \"demo\"\n{IMPL}\n{body}")
    }

    #[test]
    fn parse_minimal_config() {
        let config = load_config_from_str(&with_project("")).unwrap();
        assert_eq!(config.project.name, "demo");
        assert_eq!(config.implementation.tool, "vivado");
        assert!(config.kernels.is_empty());
        assert!(config.slots.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = with_project(
            r#"
[shuffler]
slots = 4
stages = 2
clkbuf = "global"
rstbuf = "none"

[[kernels]]
name = "matmul"
hwsrc = "hls"
membytes = 16384
membanks = 3
regs = 1
rstpol = "low"

[[kernels]]
name = "aes"
hwsrc = "vhdl"
membytes = 4096
membanks = 2

[[slots]]
id = 0
kernels = ["matmul"]

[[slots]]
id = 3
kernels = ["aes", "matmul"]
"#,
        );
        let config = load_config_from_str(&toml).unwrap();
        assert_eq!(config.shuffler.slots, 4);
        assert_eq!(config.shuffler.stages, 2);
        assert_eq!(config.kernels.len(), 2);
        assert_eq!(config.kernels[0].membytes, 16384);
        assert_eq!(config.kernels[0].rstpol, crate::types::ResetPolarity::Low);
        assert_eq!(config.slots[1].kernels, vec!["aes", "matmul"]);
    }

    #[test]
    fn missing_name_errors() {
        let toml = format!("[project]\nname = \"\"\n{IMPL}");
        let err = load_config_from_str(&toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn empty_board_errors() {
        let toml = format!("[project]\nname = \"x\"\n{}", IMPL.replace("[\"zybo\"]", "[]"));
        let err = load_config_from_str(&toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(f) if f == "impl.board"));
    }

    #[test]
    fn missing_impl_is_parse_error() {
        let err = load_config_from_str("[project]\nname = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn unknown_hwsrc_errors() {
        let toml = with_project("[[kernels]]\nname = \"k\"\nhwsrc = \"chisel\"\n");
        let err = load_config_from_str(&toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn duplicate_kernel_case_insensitive() {
        let toml = with_project(
            "[[kernels]]\nname = \"Fir\"\nhwsrc = \"hls\"\n\n[[kernels]]\nname = \"fir\"\nhwsrc = \"vhdl\"\n",
        );
        let err = load_config_from_str(&toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn slot_out_of_range() {
        let toml = with_project("[shuffler]\nslots = 2\n\n[[slots]]\nid = 2\n");
        let err = load_config_from_str(&toml).unwrap_err();
        assert!(format!("{err}").contains("out of range"));
    }

    #[test]
    fn duplicate_slot() {
        let toml =
            with_project("[shuffler]\nslots = 2\n\n[[slots]]\nid = 1\n\n[[slots]]\nid = 1\n");
        let err = load_config_from_str(&toml).unwrap_err();
        assert!(format!("{err}").contains("duplicate slot 1"));
    }

    #[test]
    fn slot_unknown_kernel() {
        let toml = with_project("[[slots]]\nid = 0\nkernels = [\"ghost\"]\n");
        let err = load_config_from_str(&toml).unwrap_err();
        assert!(format!("{err}").contains("unknown kernel 'ghost'"));
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn config_file_with_custom_name() {
        let tmp = tempfile::TempDir::new().unwrap();
        let custom = tmp.path().join("custom.toml");
        std::fs::write(&custom, with_project("")).unwrap();
        assert!(load_config_file(&custom).is_ok());
        // The default name is absent, so directory loading fails.
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::IoError(_))));
    }

    #[test]
    fn find_root_walks_up() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), with_project("")).unwrap();
        let nested = tmp.path().join("src").join("a3_fir");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_project_root(&nested).unwrap(), tmp.path());
    }

    #[test]
    fn find_root_fails_without_config() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = find_project_root(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ProjectNotFound(_)));
    }
}
