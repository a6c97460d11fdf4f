//! Shared record types and loaders for the registry suites.
//!
//! Tables are stored as one `<TYPE_NAME>.csv` file per type under the
//! registry location, one `id,lvl,kind` row per line.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub use basedb::{
    Error, IndexDef, IndexValue, Record, RecordBinding, RecordType, RegistryConfig,
    ReloadCoordinator, ReloadListener, Result, StaticCatalog, StoreRegistry,
};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: u32,
    pub lvl: i64,
    pub kind: String,
}

impl Record for Item {
    type Id = u32;
    const TYPE_NAME: &'static str = "Item";
    const NAMESPACE: &'static str = "game.bag.basedb.model";

    fn id(&self) -> u32 {
        self.id
    }

    fn indexes() -> Vec<IndexDef<Self>> {
        vec![
            IndexDef::single("lvl", |i: &Item| i.lvl),
            IndexDef::new("kind_lvl", |i: &Item| {
                Some(basedb::smallvec![i.kind.as_str().into(), i.lvl.into()])
            }),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    pub id: u32,
    pub lvl: i64,
    pub kind: String,
}

impl Record for Skill {
    type Id = u32;
    const TYPE_NAME: &'static str = "Skill";
    const NAMESPACE: &'static str = "game.fight.basedb.model";

    fn id(&self) -> u32 {
        self.id
    }
}

/// Row type shared by the csv loader
pub trait Row: Record + Sized {
    fn from_row(id: u32, lvl: i64, kind: String) -> Self;
}

impl Row for Item {
    fn from_row(id: u32, lvl: i64, kind: String) -> Self {
        Item { id, lvl, kind }
    }
}

impl Row for Skill {
    fn from_row(id: u32, lvl: i64, kind: String) -> Self {
        Skill { id, lvl, kind }
    }
}

/// Loader reading `<location>/<TYPE_NAME>.csv`
pub fn csv_loader<T: Row>(ty: &RecordType, location: &Path) -> Result<Vec<T>> {
    let path = location.join(format!("{}.csv", ty.name()));
    if !path.exists() {
        return Err(Error::source_missing(ty.name(), path.display().to_string()));
    }

    fs::read_to_string(&path)?
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_row(ty, line))
        .collect()
}

fn parse_row<T: Row>(ty: &RecordType, line: &str) -> Result<T> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [id, lvl, kind] = fields.as_slice() else {
        return Err(Error::load(ty.name(), format!("expected 3 fields in '{}'", line)));
    };
    let id = id
        .parse()
        .map_err(|_| Error::load(ty.name(), format!("bad id '{}'", id)))?;
    let lvl = lvl
        .parse()
        .map_err(|_| Error::load(ty.name(), format!("bad lvl '{}'", lvl)))?;
    Ok(T::from_row(id, lvl, kind.to_string()))
}

/// Temporary data directory holding csv tables
pub struct TableDir {
    pub dir: TempDir,
}

impl TableDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, type_name: &str, rows: &[&str]) {
        let body = rows.join("\n");
        fs::write(self.path().join(format!("{}.csv", type_name)), body).unwrap();
    }

    pub fn config(&self) -> RegistryConfig {
        RegistryConfig {
            location: self.path().to_path_buf(),
            ..RegistryConfig::default()
        }
    }
}

/// The standard item table: ids 1 and 2 at lvl 3, id 3 at lvl 5
pub const ITEM_ROWS: &[&str] = &["1,3,sword", "2,3,shield", "3,5,sword"];

pub fn catalog() -> StaticCatalog {
    StaticCatalog::new()
        .with(RecordBinding::new::<Item, _>(csv_loader::<Item>))
        .with(RecordBinding::new::<Skill, _>(csv_loader::<Skill>))
}

pub fn ids<T: Record>(records: &[std::sync::Arc<T>]) -> Vec<T::Id> {
    records.iter().map(|r| r.id()).collect()
}
