//! Material configuration loader.
//!
//! Loads ball, cloth and cue presets from YAML files so a different table
//! setup needs no recompilation. A driver config selects them by name, see
//! [`crate::simulation::MaterialPresets`].
//!
//! ## Directory Structure
//!
//! ```text
//! materials/
//! ├── balls/
//! │   ├── regulation.yaml
//! │   └── snooker.yaml
//! ├── cloths/
//! │   ├── standard.yaml
//! │   └── worsted.yaml
//! └── cues/
//!     ├── house.yaml
//!     └── break.yaml
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::PhysicsError;
use crate::friction::FrictionModel;
use crate::types::{BallProperties, ClothProperties, CueProperties};

/// Error type for material loading operations.
#[derive(Debug)]
pub enum MaterialError {
    IoError(std::io::Error),
    ParseError(serde_yaml::Error),
    NotFound(String),
    /// The file parsed but describes an impossible material
    Invalid(PhysicsError),
}

impl std::fmt::Display for MaterialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterialError::IoError(e) => write!(f, "IO error: {}", e),
            MaterialError::ParseError(e) => write!(f, "YAML parse error: {}", e),
            MaterialError::NotFound(name) => write!(f, "Material not found: {}", name),
            MaterialError::Invalid(e) => write!(f, "Invalid material: {}", e),
        }
    }
}

impl std::error::Error for MaterialError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MaterialError::IoError(e) => Some(e),
            MaterialError::ParseError(e) => Some(e),
            MaterialError::Invalid(e) => Some(e),
            MaterialError::NotFound(_) => None,
        }
    }
}

impl From<std::io::Error> for MaterialError {
    fn from(err: std::io::Error) -> Self {
        MaterialError::IoError(err)
    }
}

impl From<serde_yaml::Error> for MaterialError {
    fn from(err: serde_yaml::Error) -> Self {
        MaterialError::ParseError(err)
    }
}

impl From<PhysicsError> for MaterialError {
    fn from(err: PhysicsError) -> Self {
        MaterialError::Invalid(err)
    }
}

/// Read and parse a YAML file, reporting a missing file as `NotFound`.
pub(crate) fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, MaterialError> {
    if !path.exists() {
        return Err(MaterialError::NotFound(path.display().to_string()));
    }
    let contents = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

/// Material loader with configurable base directory.
pub struct MaterialLoader {
    base_path: PathBuf,
}

impl MaterialLoader {
    /// Create a new loader with the given base path.
    ///
    /// The base path should contain `balls/`, `cloths/`, and `cues/` subdirectories.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Load a ball by name (without .yaml extension).
    ///
    /// # Example
    /// ```ignore
    /// let loader = MaterialLoader::new("materials");
    /// let ball = loader.load_ball("regulation")?;
    /// ```
    pub fn load_ball(&self, name: &str) -> Result<BallProperties, MaterialError> {
        let props: BallProperties = self.load("balls", name)?;
        props.validate()?;
        Ok(props)
    }

    /// Load a cloth by name.
    pub fn load_cloth(&self, name: &str) -> Result<ClothProperties, MaterialError> {
        let props: ClothProperties = self.load("cloths", name)?;
        FrictionModel::from_cloth(&props)?;
        Ok(props)
    }

    /// Load a cue by name.
    pub fn load_cue(&self, name: &str) -> Result<CueProperties, MaterialError> {
        let props: CueProperties = self.load("cues", name)?;
        if !(props.mass.is_finite() && props.mass > 0.0) {
            return Err(PhysicsError::InvalidMass(props.mass).into());
        }
        Ok(props)
    }

    /// List all available balls.
    pub fn list_balls(&self) -> Result<Vec<String>, MaterialError> {
        self.list_materials("balls")
    }

    /// List all available cloths.
    pub fn list_cloths(&self) -> Result<Vec<String>, MaterialError> {
        self.list_materials("cloths")
    }

    /// List all available cues.
    pub fn list_cues(&self) -> Result<Vec<String>, MaterialError> {
        self.list_materials("cues")
    }

    fn load<T: DeserializeOwned>(&self, subdir: &str, name: &str) -> Result<T, MaterialError> {
        let path = self.base_path.join(subdir).join(format!("{}.yaml", name));
        read_yaml(&path).map_err(|e| match e {
            MaterialError::NotFound(_) => MaterialError::NotFound(name.to_string()),
            other => other,
        })
    }

    fn list_materials(&self, subdir: &str) -> Result<Vec<String>, MaterialError> {
        let path = self.base_path.join(subdir);
        if !path.exists() {
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if name.ends_with(".yaml") {
                names.push(name.trim_end_matches(".yaml").to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn materials_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .join("materials")
    }

    #[test]
    fn test_load_regulation_ball() {
        let loader = MaterialLoader::new(materials_path());
        let ball = loader.load_ball("regulation").unwrap();

        assert_eq!(ball.name, "Regulation pool ball");
        assert!((ball.mass - 0.17).abs() < 1e-9);
        assert!((ball.radius - 0.028575).abs() < 1e-9);
    }

    #[test]
    fn test_load_standard_cloth() {
        let loader = MaterialLoader::new(materials_path());
        let cloth = loader.load_cloth("standard").unwrap();

        assert_eq!(cloth, ClothProperties::standard());
    }

    #[test]
    fn test_load_house_cue() {
        let loader = MaterialLoader::new(materials_path());
        let cue = loader.load_cue("house").unwrap();

        assert!((cue.mass - 0.59).abs() < 1e-9);
    }

    #[test]
    fn test_list_materials() {
        let loader = MaterialLoader::new(materials_path());

        let balls = loader.list_balls().unwrap();
        assert!(balls.contains(&"regulation".to_string()));
        assert!(balls.contains(&"snooker".to_string()));

        let cloths = loader.list_cloths().unwrap();
        assert_eq!(cloths, vec!["standard".to_string(), "worsted".to_string()]);

        let cues = loader.list_cues().unwrap();
        assert!(cues.contains(&"house".to_string()));
    }

    #[test]
    fn test_missing_material() {
        let loader = MaterialLoader::new(materials_path());
        let result = loader.load_ball("nonexistent");

        assert!(matches!(result, Err(MaterialError::NotFound(name)) if name == "nonexistent"));
    }

    #[test]
    fn test_missing_directory_lists_nothing() {
        let loader = MaterialLoader::new(materials_path().join("nowhere"));
        assert!(loader.list_cues().unwrap().is_empty());
    }
}
