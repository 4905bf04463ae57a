//! Static obstacle map
//!
//! Built once from a tile grid (rows of comma-separated codes 0-7) and never
//! mutated during play. Codes 1-3 are walls; every wall tile becomes a 16x16
//! obstacle rectangle centered on the tile's world corner.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::consts::*;

/// Errors produced while loading a map grid
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("map grid is empty")]
    Empty,

    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid tile {cell:?} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, cell: String },

    #[error("tile code {code} at row {row}, column {col} is out of range (0-7)")]
    UnknownTile { row: usize, col: usize, code: u8 },

    #[error("failed to read map file: {0}")]
    Io(#[from] std::io::Error),
}

/// What a grid cell holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Floor,
    /// Wall variants 1-3 (texture only)
    Wall(u8),
    /// Codes 4-7 mark spawn points in the editor; they play as floor
    Marker,
}

impl TileKind {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(TileKind::Floor),
            1..=3 => Some(TileKind::Wall(code)),
            4..=7 => Some(TileKind::Marker),
            _ => None,
        }
    }

    pub fn blocks(&self) -> bool {
        matches!(self, TileKind::Wall(_))
    }
}

/// One static wall tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleTile {
    pub world_x: f32,
    pub world_y: f32,
    pub rect: Rect,
}

impl ObstacleTile {
    pub fn at_cell(col: usize, row: usize) -> Self {
        let world_x = col as f32 * TILE_SIZE;
        let world_y = row as f32 * TILE_SIZE;
        Self {
            world_x,
            world_y,
            rect: Rect::square(Vec2::new(world_x, world_y), TILE_SIZE),
        }
    }
}

/// Playable region, used to clamp spawn positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            min: Vec2::new(MAP_X_START, MAP_Y_START),
            max: Vec2::new(MAP_X_END, MAP_Y_END),
        }
    }
}

impl ArenaBounds {
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Clamp a candidate spawn point, keeping `margin` from every edge and an
    /// extra band along the top
    pub fn clamp_spawn(&self, p: Vec2, margin: f32) -> Vec2 {
        Vec2::new(
            p.x.max(self.min.x + margin).min(self.max.x - margin),
            p.y.max(self.min.y + margin + SPAWN_TOP_CLEARANCE)
                .min(self.max.y - margin),
        )
    }
}

/// Cell index over the tile list for grid-built maps
#[derive(Debug, Clone, Default)]
struct TileGrid {
    cols: usize,
    rows: usize,
    /// Index into `tiles` for each wall cell
    cells: Vec<Option<u32>>,
}

/// Static wall layout plus arena bounds
#[derive(Debug, Clone)]
pub struct ObstacleMap {
    tiles: Vec<ObstacleTile>,
    grid: Option<TileGrid>,
    /// Physical world extent; bullets expire outside it
    pub world: Rect,
    pub arena: ArenaBounds,
}

impl Default for ObstacleMap {
    fn default() -> Self {
        Self::open(Rect::new(0.0, 0.0, MAP_SIZE, MAP_SIZE), ArenaBounds::default())
    }
}

impl ObstacleMap {
    /// A map with no obstacles at all
    pub fn open(world: Rect, arena: ArenaBounds) -> Self {
        Self {
            tiles: Vec::new(),
            grid: None,
            world,
            arena,
        }
    }

    /// A map from arbitrary obstacle rectangles (no grid index)
    pub fn from_tiles(tiles: Vec<ObstacleTile>, world: Rect, arena: ArenaBounds) -> Self {
        Self {
            tiles,
            grid: None,
            world,
            arena,
        }
    }

    /// The standard 200x200 arena: open floor inside a 3-tile wall border
    pub fn walled_arena() -> Self {
        let codes = (0..MAP_ROWS)
            .map(|row| {
                (0..MAP_COLS)
                    .map(|col| {
                        let border = row < BORDER_TILES
                            || col < BORDER_TILES
                            || row >= MAP_ROWS - BORDER_TILES
                            || col >= MAP_COLS - BORDER_TILES;
                        if border { 1 } else { 0 }
                    })
                    .collect()
            })
            .collect();
        Self::from_codes(codes)
    }

    /// Parse the textual grid format
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let mut codes: Vec<Vec<u8>> = Vec::new();
        for (row, line) in text.lines().map(str::trim).filter(|l| !l.is_empty()).enumerate() {
            let mut parsed = Vec::new();
            for (col, cell) in line.split(',').enumerate() {
                let cell = cell.trim();
                let code: u8 = cell.parse().map_err(|_| MapError::InvalidCell {
                    row,
                    col,
                    cell: cell.to_string(),
                })?;
                if code >= TILE_TYPES {
                    return Err(MapError::UnknownTile { row, col, code });
                }
                parsed.push(code);
            }
            if let Some(first) = codes.first() {
                if parsed.len() != first.len() {
                    return Err(MapError::RaggedRow {
                        row,
                        expected: first.len(),
                        found: parsed.len(),
                    });
                }
            }
            codes.push(parsed);
        }
        if codes.is_empty() {
            return Err(MapError::Empty);
        }
        Ok(Self::from_codes(codes))
    }

    /// Load and parse a map file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let map = Self::parse(&text)?;
        log::info!(
            "Loaded map {} ({} obstacles)",
            path.as_ref().display(),
            map.tiles.len()
        );
        Ok(map)
    }

    /// Build from already validated codes (rectangular, 0-7)
    fn from_codes(codes: Vec<Vec<u8>>) -> Self {
        let rows = codes.len();
        let cols = codes.first().map(Vec::len).unwrap_or(0);
        let mut tiles = Vec::new();
        let mut cells = vec![None; rows * cols];

        for (row, line) in codes.iter().enumerate() {
            for (col, &code) in line.iter().enumerate() {
                if TileKind::from_code(code).is_some_and(|k| k.blocks()) {
                    cells[row * cols + col] = Some(tiles.len() as u32);
                    tiles.push(ObstacleTile::at_cell(col, row));
                }
            }
        }

        let border = BORDER_TILES as f32 * TILE_SIZE;
        let world = Rect::new(0.0, 0.0, cols as f32 * TILE_SIZE, rows as f32 * TILE_SIZE);
        let arena = ArenaBounds {
            min: Vec2::new(border, border),
            max: Vec2::new(
                (world.width - border).max(border),
                (world.height - border).max(border),
            ),
        };

        Self {
            tiles,
            grid: Some(TileGrid { cols, rows, cells }),
            world,
            arena,
        }
    }

    /// All obstacles in load order
    pub fn obstacles(&self) -> &[ObstacleTile] {
        &self.tiles
    }

    /// True if `rect` overlaps any obstacle
    pub fn blocked(&self, rect: &Rect) -> bool {
        match &self.grid {
            Some(grid) => self.blocked_indexed(grid, rect),
            None => self.tiles.iter().any(|t| t.rect.intersects(rect)),
        }
    }

    /// Only visit cells whose 16x16 rect (centered on the cell corner) can touch `rect`
    fn blocked_indexed(&self, grid: &TileGrid, rect: &Rect) -> bool {
        if grid.cols == 0 || grid.rows == 0 {
            return false;
        }
        let half = TILE_SIZE / 2.0;
        let cell_range = |lo: f32, hi: f32, count: usize| {
            let first = ((lo - half) / TILE_SIZE).floor().max(0.0) as usize;
            let last = ((hi + half) / TILE_SIZE).ceil().max(0.0) as usize;
            (first, last.min(count - 1))
        };
        let (c0, c1) = cell_range(rect.x, rect.right(), grid.cols);
        let (r0, r1) = cell_range(rect.y, rect.bottom(), grid.rows);
        if c0 > c1 || r0 > r1 {
            return false;
        }
        (r0..=r1).any(|row| {
            (c0..=c1).any(|col| {
                grid.cells[row * grid.cols + col]
                    .is_some_and(|i| self.tiles[i as usize].rect.intersects(rect))
            })
        })
    }

    /// False iff a square of edge `actor_size` centered at `pos` overlaps an obstacle
    pub fn is_position_valid(&self, pos: Vec2, actor_size: f32) -> bool {
        !self.blocked(&Rect::square(pos, actor_size))
    }

    /// Spawn check sized for a regular actor or a boss
    pub fn is_spawn_valid(&self, pos: Vec2, boss: bool) -> bool {
        let size = if boss {
            CHARACTER_SIZE * BOSS_SCALE
        } else {
            CHARACTER_SIZE
        };
        self.is_position_valid(pos, size)
    }

    /// True while `rect` still overlaps the physical world
    pub fn in_world(&self, rect: &Rect) -> bool {
        self.world.intersects(rect)
    }
}
