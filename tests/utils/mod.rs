#![allow(dead_code)]

use std::path::{Path, PathBuf};

use dog_registry::algorithm::report::{ReportData, ReportSpec};
use dog_registry::{ChartSink, RecordBatch, RegistryError, Result, prepare_dataset, read_prepared};

/// Header of the raw Zurich export; only the retained positions matter
pub const RAW_HEADER: [&str; 28] = [
    "StichtagDatJahr",
    "DatenstandCd",
    "HalterId",
    "AlterV10Cd",
    "AlterV10Lang",
    "AlterV10Sort",
    "SexLang",
    "SexSort",
    "SexCd",
    "KreisCd",
    "KreisLang",
    "KreisSort",
    "QuarCd",
    "QuarLang",
    "QuarSort",
    "Rasse1Text",
    "Rasse2Text",
    "RasseMischlingCd",
    "RassentypLang",
    "RassentypCd",
    "RassentypSort",
    "GebDatHundJahr",
    "GebDatHundSort",
    "GebDatHundJahrCd",
    "AlterVHundCd",
    "AlterVHundLang",
    "AlterVHundSort",
    "SexHundCd",
];

/// Prepared header line as written to the artifact
pub const PREPARED_HEADER_LINE: &str = "Year,Age of dog owner,Gender of dog owner,City district dog owner,Primary breed of dog,Mixed breed,Year of birth of the dog,Age of the dog,Code gender of the dog";

/// One registry entry with the fields the reports look at
#[derive(Debug, Clone)]
pub struct DogRow {
    pub year: i64,
    pub owner_age: i64,
    pub owner_gender: i64,
    pub district: String,
    pub breed: String,
    pub mixed: String,
    pub birth_year: i64,
    pub dog_age: i64,
    pub dog_gender: i64,
}

impl DogRow {
    /// A pedigree dog of `breed` registered in `year`
    pub fn new(year: i64, breed: &str) -> Self {
        Self {
            year,
            owner_age: 40,
            owner_gender: 1,
            district: "Altstetten".to_string(),
            breed: breed.to_string(),
            mixed: "Rassehund".to_string(),
            birth_year: year - 3,
            dog_age: 3,
            dog_gender: 1,
        }
    }

    pub fn owner_age(mut self, age: i64) -> Self {
        self.owner_age = age;
        self
    }

    pub fn owner_gender(mut self, code: i64) -> Self {
        self.owner_gender = code;
        self
    }

    pub fn district(mut self, district: &str) -> Self {
        self.district = district.to_string();
        self
    }

    pub fn mixed(mut self, label: &str) -> Self {
        self.mixed = label.to_string();
        self
    }

    pub fn dog_age(mut self, age: i64) -> Self {
        self.dog_age = age;
        self
    }

    pub fn dog_gender(mut self, code: i64) -> Self {
        self.dog_gender = code;
        self
    }

    /// The row as 28 raw fields
    fn raw_fields(&self) -> Vec<String> {
        (0..RAW_HEADER.len())
            .map(|position| match position {
                0 => self.year.to_string(),
                3 => self.owner_age.to_string(),
                8 => self.owner_gender.to_string(),
                13 => self.district.clone(),
                15 => self.breed.clone(),
                18 => self.mixed.clone(),
                23 => self.birth_year.to_string(),
                24 => self.dog_age.to_string(),
                27 => self.dog_gender.to_string(),
                other => format!("x{other}"),
            })
            .collect()
    }
}

/// Write a raw export with the given rows
pub fn write_raw(path: &Path, rows: &[DogRow]) {
    let mut content = RAW_HEADER.join(",");
    content.push('\n');
    for row in rows {
        content.push_str(&row.raw_fields().join(","));
        content.push('\n');
    }
    std::fs::write(path, content).unwrap();
}

/// Raw and prepared paths inside a temporary directory
pub struct Workspace {
    pub dir: tempfile::TempDir,
    pub raw: PathBuf,
    pub prepared: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("dataset.csv");
        let prepared = dir.path().join("dataset_prepared.csv");
        Self { dir, raw, prepared }
    }

    pub fn with_rows(rows: &[DogRow]) -> Self {
        let workspace = Self::new();
        write_raw(&workspace.raw, rows);
        workspace
    }
}

/// Prepare `rows` and load the prepared table back
pub fn prepared_table(rows: &[DogRow]) -> RecordBatch {
    let workspace = Workspace::with_rows(rows);
    prepare_dataset(&workspace.raw, &workspace.prepared).unwrap();
    read_prepared(&workspace.prepared).unwrap()
}

/// Sink that keeps every report it is given instead of drawing it
#[derive(Default)]
pub struct RecordingSink {
    pub rendered: Vec<(String, ReportData)>,
    /// Reports whose rendering fails
    pub fail_on: Vec<String>,
}

impl RecordingSink {
    pub fn failing_on(name: &str) -> Self {
        Self {
            fail_on: vec![name.to_string()],
            ..Default::default()
        }
    }

    pub fn data(&self, name: &str) -> Option<&ReportData> {
        self.rendered
            .iter()
            .find(|(rendered, _)| rendered == name)
            .map(|(_, data)| data)
    }
}

impl ChartSink for RecordingSink {
    fn render(&mut self, spec: &ReportSpec, data: &ReportData) -> Result<Option<PathBuf>> {
        if self.fail_on.contains(&spec.name) {
            return Err(RegistryError::render(format!("refusing {}", spec.name)));
        }
        self.rendered.push((spec.name.clone(), data.clone()));
        Ok(None)
    }
}
