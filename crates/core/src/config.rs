//! Session configuration
//!
//! Values are fixed when a session is constructed. Sources are layered: built-in defaults,
//! then an optional JSON document, then `TILE_BLAST_*` environment overrides, and finally
//! [`GameConfig::validate`]. An invalid configuration is reported before the first tile is
//! created.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::*;

/// Largest number of columns or rows a grid may have
pub const MAX_GRID_SIDE: usize = 64;

/// Presentation-space geometry the grid size is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLayout {
    pub field_width: u32,
    pub field_height: u32,
    pub tile_size: u32,
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self {
            field_width: DEFAULT_FIELD_WIDTH,
            field_height: DEFAULT_FIELD_HEIGHT,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

impl FieldLayout {
    pub fn columns(&self) -> usize {
        (self.field_width / self.tile_size.max(1)) as usize
    }

    pub fn rows(&self) -> usize {
        (self.field_height / self.tile_size.max(1)) as usize
    }
}

/// Configuration errors surfaced at session construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Grid would have no columns or no rows
    EmptyGrid { columns: usize, rows: usize },
    /// Grid exceeds [`MAX_GRID_SIDE`] on either axis
    GridTooLarge { columns: usize, rows: usize },
    /// More kinds requested than the catalog provides, or none at all
    KindCatalog { requested: u8, available: usize },
    /// Blast threshold must be at least one tile
    ZeroBlastThreshold,
    /// Power threshold below the blast threshold
    PowerBelowBlast { min_power: u32, min_blast: u32 },
    ZeroTurns,
    ZeroWinScore,
    /// A preset board does not match the configured dimensions
    BoardShape {
        expected_columns: usize,
        expected_rows: usize,
        columns: usize,
        rows: usize,
    },
    /// A preset board uses a kind outside the configured catalog prefix
    KindOutOfCatalog { kind: TileKind, kind_count: u8 },
    /// JSON document could not be parsed
    Parse(String),
    /// An environment override was present but not a usable number
    InvalidEnv { var: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { columns, rows } => {
                write!(f, "grid must have at least one cell, got {columns}x{rows}")
            }
            Self::GridTooLarge { columns, rows } => write!(
                f,
                "grid of {columns}x{rows} exceeds {MAX_GRID_SIDE} cells per side"
            ),
            Self::KindCatalog {
                requested,
                available,
            } => write!(
                f,
                "requested {requested} tile kinds, but the catalog provides 1..={available}"
            ),
            Self::ZeroBlastThreshold => write!(f, "min_blast_group must be at least 1"),
            Self::PowerBelowBlast {
                min_power,
                min_blast,
            } => write!(
                f,
                "min_power_group ({min_power}) must not be below min_blast_group ({min_blast})"
            ),
            Self::ZeroTurns => write!(f, "turn_budget must be at least 1"),
            Self::ZeroWinScore => write!(f, "win_score must be at least 1"),
            Self::BoardShape {
                expected_columns,
                expected_rows,
                columns,
                rows,
            } => write!(
                f,
                "preset board is {columns}x{rows}, expected {expected_columns}x{expected_rows}"
            ),
            Self::KindOutOfCatalog { kind, kind_count } => write!(
                f,
                "preset board uses {} but only {kind_count} kinds are in play",
                kind.as_str()
            ),
            Self::Parse(msg) => write!(f, "invalid config document: {msg}"),
            Self::InvalidEnv { var, value } => write!(f, "{var}={value:?} is not a usable number"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Complete session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub layout: FieldLayout,
    /// Number of kinds drawn for new tiles (prefix of [`TileKind::ALL`])
    pub kind_count: u8,
    pub min_blast_group: u32,
    pub min_power_group: u32,
    pub turn_budget: u32,
    pub win_score: u32,
    pub shuffle_budget: u32,
    pub seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            layout: FieldLayout::default(),
            kind_count: DEFAULT_KIND_COUNT,
            min_blast_group: DEFAULT_MIN_BLAST,
            min_power_group: DEFAULT_MIN_POWER,
            turn_budget: DEFAULT_TURNS,
            win_score: DEFAULT_WIN_SCORE,
            shuffle_budget: DEFAULT_SHUFFLES,
            seed: 1,
        }
    }
}

impl GameConfig {
    /// Config with an explicit grid size in cells (tile size stays at the default)
    pub fn with_grid(columns: usize, rows: usize) -> Self {
        let tile = DEFAULT_TILE_SIZE;
        Self {
            layout: FieldLayout {
                field_width: columns as u32 * tile,
                field_height: rows as u32 * tile,
                tile_size: tile,
                },
            ..Self::default()
        }
    }

    /// `(columns, rows)` derived from the field layout
    pub fn dimensions(&self) -> (usize, usize) {
        (self.layout.columns(), self.layout.rows())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (columns, rows) = self.dimensions();
        if self.layout.tile_size == 0 || columns == 0 || rows == 0 {
            return Err(ConfigError::EmptyGrid { columns, rows });
        }
        if columns > MAX_GRID_SIDE || rows > MAX_GRID_SIDE {
            return Err(ConfigError::GridTooLarge { columns, rows });
        }
        if self.kind_count == 0 || self.kind_count as usize > TileKind::ALL.len() {
            return Err(ConfigError::KindCatalog {
                requested: self.kind_count,
                available: TileKind::ALL.len(),
            });
        }
        if self.min_blast_group == 0 {
            return Err(ConfigError::ZeroBlastThreshold);
        }
        if self.min_power_group < self.min_blast_group {
            return Err(ConfigError::PowerBelowBlast {
                min_power: self.min_power_group,
                min_blast: self.min_blast_group,
            });
        }
        if self.turn_budget == 0 {
            return Err(ConfigError::ZeroTurns);
        }
        if self.win_score == 0 {
            return Err(ConfigError::ZeroWinScore);
        }
        Ok(())
    }

    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `TILE_BLAST_*` overrides on top of the current values.
    ///
    /// `TILE_BLAST_COLUMNS`/`TILE_BLAST_ROWS` resize the field in whole tiles.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    fn apply_vars(&mut self, get: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        fn parse<T: std::str::FromStr>(
            get: &impl Fn(&str) -> Option<String>,
            var: &'static str,
        ) -> Result<Option<T>, ConfigError> {
            match get(var) {
                None => Ok(None),
                Some(raw) => {
                    let trimmed = raw.trim().to_string();
                    if trimmed.is_empty() {
                        return Ok(None);
                    }
                    trimmed
                        .parse()
                        .map(Some)
                        .map_err(|_| ConfigError::InvalidEnv { var, value: raw })
                }
            }
        }

        let tile_size = self.layout.tile_size;
        let field_extent = |var: &'static str, cells: u32| {
            cells
                .checked_mul(tile_size)
                .ok_or_else(|| ConfigError::InvalidEnv {
                    var,
                    value: cells.to_string(),
                })
        };
        if let Some(columns) = parse::<u32>(&get, "TILE_BLAST_COLUMNS")? {
            self.layout.field_width = field_extent("TILE_BLAST_COLUMNS", columns)?;
        }
        if let Some(rows) = parse::<u32>(&get, "TILE_BLAST_ROWS")? {
            self.layout.field_height = field_extent("TILE_BLAST_ROWS", rows)?;
        }
        if let Some(v) = parse(&get, "TILE_BLAST_KINDS")? {
            self.kind_count = v;
        }
        if let Some(v) = parse(&get, "TILE_BLAST_MIN_BLAST")? {
            self.min_blast_group = v;
        }
        if let Some(v) = parse(&get, "TILE_BLAST_MIN_POWER")? {
            self.min_power_group = v;
        }
        if let Some(v) = parse(&get, "TILE_BLAST_TURNS")? {
            self.turn_budget = v;
        }
        if let Some(v) = parse(&get, "TILE_BLAST_WIN_SCORE")? {
            self.win_score = v;
        }
        if let Some(v) = parse(&get, "TILE_BLAST_SHUFFLES")? {
            self.shuffle_budget = v;
        }
        if let Some(v) = parse(&get, "TILE_BLAST_SEED")? {
            self.seed = v;
        }
        Ok(())
    }
}
