//! Narrative chapters mapped onto the timeline.
//!
//! Each chapter carries a distance; the chapter's boundary is the running sum
//! of distances up to and including it. Chapters with zero distance have no
//! boundary and are not navigable.

use serde::{Deserialize, Serialize};

use crate::error::CameraError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub distance: f32,
    #[serde(default)]
    pub completed: bool,
}

impl Chapter {
    pub fn new(id: impl Into<String>, name: impl Into<String>, distance: f32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            distance,
            completed: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.distance != 0.0 && self.distance.is_finite()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChapterTable {
    chapters: Vec<Chapter>,
}

impl ChapterTable {
    pub fn new(chapters: Vec<Chapter>) -> Self {
        Self { chapters }
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn active(&self) -> impl Iterator<Item = &Chapter> {
        self.chapters.iter().filter(|c| c.is_active())
    }

    pub fn active_len(&self) -> usize {
        self.active().count()
    }

    /// Timeline position of active chapter `index`: the sum of active
    /// distances through it.
    pub fn cumulative_target(&self, index: usize) -> Result<f32, CameraError> {
        let len = self.active_len();
        if index >= len {
            return Err(CameraError::ChapterIndexOutOfRange { index, len });
        }
        Ok(self.active().take(index + 1).map(|c| c.distance).sum())
    }

    /// Active index of the chapter whose label or id equals `name`.
    pub fn index_of(&self, name: &str) -> Result<usize, CameraError> {
        self.active()
            .position(|c| c.name == name || c.id == name)
            .ok_or_else(|| CameraError::UnknownChapter(name.to_string()))
    }

    /// Timeline position a session deep-linked to `id` starts at.
    pub fn start_position(&self, id: &str) -> Result<f32, CameraError> {
        let index = self.index_of(id)?;
        self.cumulative_target(index)
    }

    /// Advance distance configured for an interaction step, if any.
    pub fn distance_for(&self, id: &str) -> Option<f32> {
        self.chapters
            .iter()
            .find(|c| c.id == id && c.is_active())
            .map(|c| c.distance)
    }

    /// Last active chapter whose boundary has been reached.
    pub fn current_index(&self, position: f32) -> Option<usize> {
        let mut boundary = 0.0;
        let mut current = None;
        for (index, chapter) in self.active().enumerate() {
            boundary += chapter.distance;
            if boundary <= position {
                current = Some(index);
            } else {
                break;
            }
        }
        current
    }

    /// Marks every chapter whose boundary is at or before `position`.
    ///
    /// Returns the ids completed by this call. Completion is never undone.
    pub fn mark_completed_through(&mut self, position: f32) -> Vec<String> {
        let mut boundary = 0.0;
        let mut newly = Vec::new();
        for chapter in self.chapters.iter_mut().filter(|c| c.is_active()) {
            boundary += chapter.distance;
            if boundary > position {
                break;
            }
            if !chapter.completed {
                chapter.completed = true;
                newly.push(chapter.id.clone());
            }
        }
        newly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ChapterTable {
        ChapterTable::new(vec![
            Chapter::new("intro", "Introduction", 0.0),
            Chapter::new("A", "Forest", 5.0),
            Chapter::new("B", "River", 3.0),
            Chapter::new("C", "Clearing", 4.0),
        ])
    }

    #[test]
    fn test_cumulative_target() {
        let table = ChapterTable::new(vec![Chapter::new("A", "A", 5.0), Chapter::new("B", "B", 3.0)]);
        assert!((table.cumulative_target(0).unwrap() - 5.0).abs() < f32::EPSILON);
        assert!((table.cumulative_target(1).unwrap() - 8.0).abs() < f32::EPSILON);
        assert!(matches!(
            table.cumulative_target(2),
            Err(CameraError::ChapterIndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_zero_distance_chapters_skipped() {
        let table = table();
        assert_eq!(table.active_len(), 3);
        assert_eq!(table.index_of("River").unwrap(), 1);
        assert_eq!(table.index_of("C").unwrap(), 2);
        assert!(matches!(
            table.index_of("intro"),
            Err(CameraError::UnknownChapter(_))
        ));
        assert!((table.start_position("B").unwrap() - 8.0).abs() < f32::EPSILON);
        assert!(table.distance_for("intro").is_none());
        assert_eq!(table.distance_for("C"), Some(4.0));
    }

    #[test]
    fn test_current_index() {
        let table = table();
        assert_eq!(table.current_index(0.0), None);
        assert_eq!(table.current_index(5.0), Some(0));
        assert_eq!(table.current_index(11.9), Some(1));
        assert_eq!(table.current_index(30.0), Some(2));
    }

    #[test]
    fn test_completion_is_monotonic() {
        let mut table = table();
        assert_eq!(table.mark_completed_through(9.0), vec!["A", "B"]);
        assert!(table.mark_completed_through(9.0).is_empty());
        // Moving back does not undo completion.
        assert!(table.mark_completed_through(1.0).is_empty());
        assert!(table.chapters()[2].completed);
        assert_eq!(table.mark_completed_through(12.0), vec!["C"]);
    }
}
