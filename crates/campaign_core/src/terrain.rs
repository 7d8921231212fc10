//! Terrain map and the adaptability cost table.
//!
//! Terrain is consumed by the order engine through two lookups: which
//! terrain type a map point carries, and what it costs a military kind
//! to enter that terrain. Both are pure reads; a missing adaptability
//! entry is surfaced as an error by the caller, never defaulted.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::math::{Fixed, MapPoint};
use crate::records;
use crate::registry::EntityId;

/// Identifier for a terrain type.
pub type TerrainId = i32;

/// Record file for the terrain grid.
pub const MAP_SAVE_FILE: &str = "Map.csv";
/// Record file for the adaptability table.
pub const MILITARY_TERRAIN_SAVE_FILE: &str = "MilitaryTerrain.csv";

const MAP_HEADER: [&str; 3] = ["width", "height", "cells"];
const MILITARY_TERRAIN_HEADER: [&str; 3] = ["kind", "terrain", "adaptability"];

/// The campaign map's terrain grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainMap {
    width: i32,
    height: i32,
    cells: Vec<TerrainId>,
}

impl TerrainMap {
    /// Create a grid filled with one terrain type.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is not positive.
    #[must_use]
    pub fn filled(width: i32, height: i32, terrain: TerrainId) -> Self {
        assert!(width > 0, "TerrainMap width must be positive");
        assert!(height > 0, "TerrainMap height must be positive");
        Self {
            width,
            height,
            cells: vec![terrain; (width as usize) * (height as usize)],
        }
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Check if a point lies on the grid.
    #[must_use]
    pub const fn in_bounds(&self, point: MapPoint) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    /// Terrain type at a point, `None` out of bounds.
    #[must_use]
    pub fn terrain_at(&self, point: MapPoint) -> Option<TerrainId> {
        if !self.in_bounds(point) {
            return None;
        }
        let index = (point.y as usize) * (self.width as usize) + (point.x as usize);
        Some(self.cells[index])
    }

    /// Set the terrain type at a point. Returns `false` out of bounds.
    pub fn set_terrain(&mut self, point: MapPoint, terrain: TerrainId) -> bool {
        if !self.in_bounds(point) {
            return false;
        }
        let index = (point.y as usize) * (self.width as usize) + (point.x as usize);
        self.cells[index] = terrain;
        true
    }
}

/// Load the terrain grid from `dir`.
pub fn load_terrain_map(dir: &Path) -> Result<TerrainMap> {
    let path = dir.join(MAP_SAVE_FILE);
    let mut reader = records::open_reader(&path)?;

    let mut rows = reader.records();
    let record = match rows.next() {
        Some(row) => records::next_record(row, &path)?,
        None => {
            return Err(GameError::Corrupted {
                file: path.display().to_string(),
                message: "missing map record".into(),
            })
        }
    };

    let width = records::parse_i32(records::field(&record, 0, &path)?, "width", &path)?;
    let height = records::parse_i32(records::field(&record, 1, &path)?, "height", &path)?;
    if width <= 0 || height <= 0 {
        return Err(GameError::Corrupted {
            file: path.display().to_string(),
            message: format!("non-positive map size {width}x{height}"),
        });
    }

    let cells = records::parse_id_list(records::field(&record, 2, &path)?, "cell", &path)?;
    if cells.len() != (width as usize) * (height as usize) {
        return Err(GameError::Corrupted {
            file: path.display().to_string(),
            message: format!(
                "expected {} cells for {width}x{height}, found {}",
                (width as usize) * (height as usize),
                cells.len()
            ),
        });
    }

    Ok(TerrainMap {
        width,
        height,
        cells,
    })
}

/// Write the terrain grid to `dir`.
pub fn save_terrain_map(dir: &Path, map: &TerrainMap) -> Result<()> {
    let path = dir.join(MAP_SAVE_FILE);
    let mut writer = records::open_writer(&path)?;
    records::write_row(&mut writer, MAP_HEADER, &path)?;
    records::write_row(
        &mut writer,
        [
            map.width.to_string(),
            map.height.to_string(),
            records::ids_to_record(&map.cells),
        ],
        &path,
    )?;
    records::finish(&mut writer, &path)
}

/// Terrain adaptability costs per (military kind, terrain type) pair.
#[derive(Debug, Clone, Default)]
pub struct AdaptabilityTable {
    entries: HashMap<(EntityId, TerrainId), Fixed>,
}

impl AdaptabilityTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define the cost for a kind entering a terrain type.
    pub fn insert(&mut self, kind_id: EntityId, terrain: TerrainId, cost: Fixed) {
        self.entries.insert((kind_id, terrain), cost);
    }

    /// Cost for a kind entering a terrain type, `None` if undefined.
    #[must_use]
    pub fn adaptability(&self, kind_id: EntityId, terrain: TerrainId) -> Option<Fixed> {
        self.entries.get(&(kind_id, terrain)).copied()
    }

    /// Number of defined pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in deterministic (kind, terrain) order, for persistence.
    fn sorted_entries(&self) -> Vec<((EntityId, TerrainId), Fixed)> {
        let mut entries: Vec<_> = self.entries.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(key, _)| *key);
        entries
    }
}

/// Load the adaptability table from `dir`.
pub fn load_adaptability_table(dir: &Path) -> Result<AdaptabilityTable> {
    let path = dir.join(MILITARY_TERRAIN_SAVE_FILE);
    let mut reader = records::open_reader(&path)?;
    let mut table = AdaptabilityTable::new();

    for row in reader.records() {
        let record = records::next_record(row, &path)?;
        let kind = records::parse_i32(records::field(&record, 0, &path)?, "kind", &path)?;
        let terrain = records::parse_i32(records::field(&record, 1, &path)?, "terrain", &path)?;
        let cost = records::parse_fixed(
            records::field(&record, 2, &path)?,
            "adaptability",
            &path,
        )?;
        table.insert(kind, terrain, cost);
    }

    Ok(table)
}

/// Write the adaptability table to `dir`.
pub fn save_adaptability_table(dir: &Path, table: &AdaptabilityTable) -> Result<()> {
    let path = dir.join(MILITARY_TERRAIN_SAVE_FILE);
    let mut writer = records::open_writer(&path)?;
    records::write_row(&mut writer, MILITARY_TERRAIN_HEADER, &path)?;
    for ((kind, terrain), cost) in table.sorted_entries() {
        records::write_row(
            &mut writer,
            [kind.to_string(), terrain.to_string(), cost.to_string()],
            &path,
        )?;
    }
    records::finish(&mut writer, &path)
}
