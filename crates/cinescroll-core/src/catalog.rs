//! Scene catalog: chapters, interaction points and tunables, loaded once.

use serde::{Deserialize, Serialize};

use crate::chapter::Chapter;
use crate::config::EngineConfig;
use crate::error::CameraError;
use crate::gate::InteractionPoint;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub points: Vec<InteractionPoint>,
    #[serde(default)]
    pub config: EngineConfig,
    /// Chapter id the session starts at instead of position zero.
    #[serde(default)]
    pub start_chapter: Option<String>,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self, CameraError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        for (point, prerequisite) in catalog.dangling_prerequisites() {
            tracing::warn!(
                "[catalog] point '{}' requires unknown point '{}' and can never fire",
                point,
                prerequisite
            );
        }
        Ok(catalog)
    }

    /// `(point, prerequisite)` pairs whose prerequisite is not in the table.
    pub fn dangling_prerequisites(&self) -> Vec<(&str, &str)> {
        self.points
            .iter()
            .filter_map(|p| {
                let prerequisite = p.prerequisite_id.as_deref()?;
                (!self.points.iter().any(|q| q.id == prerequisite))
                    .then_some((p.id.as_str(), prerequisite))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::InterfaceKind;

    #[test]
    fn test_from_json() {
        let json = r#"{
            "chapters": [
                { "id": "firstStop", "name": "Forest", "distance": 5.0 },
                { "id": "secondStop", "name": "River", "distance": 3.0 }
            ],
            "points": [
                { "id": "firstStop", "trigger_x": 0.0, "trigger_z": -10.0, "interface": "scanner" },
                { "id": "secondStop", "trigger_x": 1.0, "trigger_z": -20.0, "prerequisite_id": "firstStop" }
            ],
            "config": { "transition": { "duration_ms": 1500.0 } },
            "start_chapter": "secondStop"
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.chapters.len(), 2);
        assert_eq!(catalog.points[0].interface, InterfaceKind::Scanner);
        assert!((catalog.config.transition.duration_ms - 1500.0).abs() < f64::EPSILON);
        assert_eq!(catalog.start_chapter.as_deref(), Some("secondStop"));
        assert!(catalog.dangling_prerequisites().is_empty());
    }

    #[test]
    fn test_dangling_prerequisite() {
        let catalog = Catalog::from_json(
            r#"{ "points": [{ "id": "a", "trigger_x": 0, "trigger_z": 0, "prerequisite_id": "ghost" }] }"#,
        )
        .unwrap();
        assert_eq!(catalog.dangling_prerequisites(), vec![("a", "ghost")]);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Catalog::from_json("{ \"chapters\": 3 }"),
            Err(CameraError::Json(_))
        ));
    }
}
