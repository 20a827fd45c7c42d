// src/config.rs

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use url::Url;

static DEFAULT_DATA_DIR: &str = "/home/mcalvert/ABCD3";
static DEFAULT_API_BASE: &str = "https://nda.nih.gov/api/datadictionary/datastructure/";
static DEFAULT_EVENT: &str = "baseline_year_1_arm_1";

static COMMON_COLUMNS: &[&str] = &[
    "subjectkey",
    "interview_date",
    "interview_age",
    "eventname",
    "sex",
];

static DEMOGRAPHIC: &[&str] = &[
    "site_id_l",
    "anthroheightcalc",
    "anthroweightcalc",
    "ehi_y_ss_scoreb",
    "neighborhood_crime_y",
    "snellen_aid_y",
];
static CLINICAL: &[&str] = &[
    "ksads_1_2_t",
    "ksads_8_29_t",
    "ksads_25_33_t",
    "ksads_13_929_t",
    "pps_y_ss_severity_score",
];
static BEHAVIORAL: &[&str] = &["prosocial_q2_y", "prosocial_q3_y"];
static IMAGING: &[&str] = &[
    "smri_vol_cdk_total",
    "smri_vol_scs_amygdalalh",
    "mri_info_manufacturer",
];

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Run configuration. Defaults are overlaid by an optional YAML file and then
/// by command-line flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub pattern: String,
    pub delimiter: String,
    pub output: PathBuf,
    pub structures_output: Option<PathBuf>,
    pub api_base: Url,
    pub event: String,
    pub offline: bool,
    pub join: JoinConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JoinConfig {
    pub output: PathBuf,
    pub common: Vec<String>,
    /// Named groups of elements, read in the order listed.
    pub elements: Vec<ElementGroup>,
}

/// A named list of elements, e.g. `demographic` or `imaging`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementGroup {
    pub name: String,
    #[serde(default)]
    pub elements: Vec<String>,
}

impl ElementGroup {
    pub fn new(name: &str, elements: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            elements: owned(elements),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            pattern: "*.txt".to_string(),
            delimiter: "\t".to_string(),
            output: PathBuf::from("data_elements.tsv"),
            structures_output: None,
            api_base: Url::parse(DEFAULT_API_BASE).expect("default API base should parse"),
            event: DEFAULT_EVENT.to_string(),
            offline: false,
            join: JoinConfig::default(),
        }
    }
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("joined.tsv"),
            common: owned(COMMON_COLUMNS),
            elements: vec![
                ElementGroup::new("demographic", DEMOGRAPHIC),
                ElementGroup::new("clinical", CLINICAL),
                ElementGroup::new("behavioral", BEHAVIORAL),
                ElementGroup::new("cognitive", &[]),
                ElementGroup::new("imaging", IMAGING),
            ],
        }
    }
}

impl Config {
    /// Load a YAML config file. Fields it omits keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        let cfg: Config =
            serde_yaml::from_str(&text).with_context(|| format!("parsing config {:?}", path))?;
        cfg.delimiter_byte()?;
        Ok(cfg)
    }

    /// The field delimiter as a single byte.
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [b] => Ok(*b),
            _ => bail!(
                "delimiter must be exactly one byte, got {:?}",
                self.delimiter
            ),
        }
    }

    /// Every element of interest across all groups, in the order listed,
    /// first occurrence wins.
    pub fn elements_of_interest(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for name in self.join.elements.iter().flat_map(|g| &g.elements) {
            if !out.contains(name) {
                out.push(name.clone());
            }
        }
        out
    }
}
