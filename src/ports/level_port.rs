//! Output sink port for calculated index levels.

use crate::domain::engine::{IndexLevel, SelectionRecord};
use crate::domain::error::IndexError;
use std::path::Path;

pub trait LevelPort {
    fn write_levels(&self, levels: &[IndexLevel], destination: &Path) -> Result<(), IndexError>;

    fn write_trail(&self, trail: &[SelectionRecord], destination: &Path)
    -> Result<(), IndexError>;
}
