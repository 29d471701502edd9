//! Category-shaped technical specs.
//!
//! The catalog stores specs as a free-form JSON object per product. Here each
//! category gets its own struct with a fixed field set, and [`Specs`] exposes
//! the cross-category fields the rule engine needs through accessors that
//! return `None` when a field is missing or meaningless for the variant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lenient;
use crate::part::Category;

/// Physical size class shared by cases and mainboards, ordered small to large.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FormFactor {
    #[serde(rename = "ITX")]
    Itx,
    #[serde(rename = "M-ATX")]
    MAtx,
    #[serde(rename = "ATX")]
    Atx,
    #[serde(rename = "E-ATX")]
    EAtx,
}

impl FormFactor {
    pub const ALL: [FormFactor; 4] = [
        FormFactor::Itx,
        FormFactor::MAtx,
        FormFactor::Atx,
        FormFactor::EAtx,
    ];
}

impl fmt::Display for FormFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormFactor::Itx => write!(f, "ITX"),
            FormFactor::MAtx => write!(f, "M-ATX"),
            FormFactor::Atx => write!(f, "ATX"),
            FormFactor::EAtx => write!(f, "E-ATX"),
        }
    }
}

impl FromStr for FormFactor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ITX" | "MINI-ITX" | "MINI ITX" => Ok(FormFactor::Itx),
            "M-ATX" | "MATX" | "MICRO-ATX" | "MICRO ATX" => Ok(FormFactor::MAtx),
            "ATX" => Ok(FormFactor::Atx),
            "E-ATX" | "EATX" => Ok(FormFactor::EAtx),
            _ => Err(format!("Unknown form factor: {s}")),
        }
    }
}

/// Coarse performance class of a CPU or GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PerfClass {
    Entry,
    Mainstream,
    Performance,
    Flagship,
}

impl fmt::Display for PerfClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerfClass::Entry => write!(f, "entry"),
            PerfClass::Mainstream => write!(f, "mainstream"),
            PerfClass::Performance => write!(f, "performance"),
            PerfClass::Flagship => write!(f, "flagship"),
        }
    }
}

impl FromStr for PerfClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entry" | "budget" => Ok(PerfClass::Entry),
            "mainstream" | "mid" => Ok(PerfClass::Mainstream),
            "performance" | "high" => Ok(PerfClass::Performance),
            "flagship" | "enthusiast" => Ok(PerfClass::Flagship),
            _ => Err(format!("Unknown performance class: {s}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuSpecs {
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub socket: Option<String>,
    #[serde(deserialize_with = "lenient::opt_u32", skip_serializing_if = "Option::is_none")]
    pub cores: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_u32", skip_serializing_if = "Option::is_none")]
    pub threads: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub base_clock: Option<String>,
    #[serde(deserialize_with = "lenient::opt_u32", skip_serializing_if = "Option::is_none")]
    pub tdp: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_parsed", skip_serializing_if = "Option::is_none")]
    pub perf_class: Option<PerfClass>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoolerSpecs {
    #[serde(
        rename = "type",
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient::opt_u32", skip_serializing_if = "Option::is_none")]
    pub tdp_rating: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainboardSpecs {
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub socket: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub chipset: Option<String>,
    #[serde(deserialize_with = "lenient::opt_parsed", skip_serializing_if = "Option::is_none")]
    pub form_factor: Option<FormFactor>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub memory_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RamSpecs {
    #[serde(
        rename = "type",
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpuSpecs {
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub chipset: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(deserialize_with = "lenient::opt_u32", skip_serializing_if = "Option::is_none")]
    pub length_mm: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_u32", skip_serializing_if = "Option::is_none")]
    pub tdp: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_parsed", skip_serializing_if = "Option::is_none")]
    pub perf_class: Option<PerfClass>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SsdSpecs {
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsuSpecs {
    #[serde(deserialize_with = "lenient::opt_u32", skip_serializing_if = "Option::is_none")]
    pub wattage: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub certification: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseSpecs {
    #[serde(deserialize_with = "lenient::opt_parsed", skip_serializing_if = "Option::is_none")]
    pub form_factor: Option<FormFactor>,
    #[serde(deserialize_with = "lenient::opt_u32", skip_serializing_if = "Option::is_none")]
    pub max_gpu_length: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSpecs {
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub refresh_rate: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamingGearSpecs {
    #[serde(
        rename = "type",
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub switch: Option<String>,
    #[serde(deserialize_with = "lenient::opt_u32", skip_serializing_if = "Option::is_none")]
    pub dpi: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Specs {
    Cpu(CpuSpecs),
    Cooler(CoolerSpecs),
    Mainboard(MainboardSpecs),
    Ram(RamSpecs),
    Gpu(GpuSpecs),
    Ssd(SsdSpecs),
    Psu(PsuSpecs),
    Case(CaseSpecs),
    Monitor(MonitorSpecs),
    GamingGear(GamingGearSpecs),
}

impl Specs {
    /// The variant for `category` with every field unset.
    pub fn empty(category: Category) -> Self {
        match category {
            Category::Cpu => Specs::Cpu(CpuSpecs::default()),
            Category::Cooler => Specs::Cooler(CoolerSpecs::default()),
            Category::Mainboard => Specs::Mainboard(MainboardSpecs::default()),
            Category::Ram => Specs::Ram(RamSpecs::default()),
            Category::Gpu => Specs::Gpu(GpuSpecs::default()),
            Category::Ssd => Specs::Ssd(SsdSpecs::default()),
            Category::Psu => Specs::Psu(PsuSpecs::default()),
            Category::Case => Specs::Case(CaseSpecs::default()),
            Category::Monitor => Specs::Monitor(MonitorSpecs::default()),
            Category::GamingGear => Specs::GamingGear(GamingGearSpecs::default()),
        }
    }

    /// Build the typed variant for `category` from a raw catalog value.
    ///
    /// Accepts a JSON object or a string containing one (JSON columns often
    /// arrive double-encoded). Anything else yields [`Specs::empty`].
    pub fn from_value(category: Category, value: Option<Value>) -> Self {
        let value = match value {
            None | Some(Value::Null) => return Self::empty(category),
            Some(Value::String(s)) => match serde_json::from_str::<Value>(&s) {
                Ok(v) => v,
                Err(e) => {
                    log::debug!("Ignoring unparseable {category} specs {s:?}: {e}");
                    return Self::empty(category);
                }
            },
            Some(v) => v,
        };

        let parsed = match category {
            Category::Cpu => serde_json::from_value(value).map(Specs::Cpu),
            Category::Cooler => serde_json::from_value(value).map(Specs::Cooler),
            Category::Mainboard => serde_json::from_value(value).map(Specs::Mainboard),
            Category::Ram => serde_json::from_value(value).map(Specs::Ram),
            Category::Gpu => serde_json::from_value(value).map(Specs::Gpu),
            Category::Ssd => serde_json::from_value(value).map(Specs::Ssd),
            Category::Psu => serde_json::from_value(value).map(Specs::Psu),
            Category::Case => serde_json::from_value(value).map(Specs::Case),
            Category::Monitor => serde_json::from_value(value).map(Specs::Monitor),
            Category::GamingGear => serde_json::from_value(value).map(Specs::GamingGear),
        };

        parsed.unwrap_or_else(|e| {
            log::warn!("Ignoring malformed {category} specs: {e}");
            Self::empty(category)
        })
    }

    pub fn socket(&self) -> Option<&str> {
        match self {
            Specs::Cpu(s) => s.socket.as_deref(),
            Specs::Mainboard(s) => s.socket.as_deref(),
            _ => None,
        }
    }

    /// Mainboard `memory_type` or RAM `type`.
    pub fn memory_type(&self) -> Option<&str> {
        match self {
            Specs::Mainboard(s) => s.memory_type.as_deref(),
            Specs::Ram(s) => s.kind.as_deref(),
            _ => None,
        }
    }

    pub fn form_factor(&self) -> Option<FormFactor> {
        match self {
            Specs::Mainboard(s) => s.form_factor,
            Specs::Case(s) => s.form_factor,
            _ => None,
        }
    }

    pub fn tdp(&self) -> Option<u32> {
        match self {
            Specs::Cpu(s) => s.tdp,
            Specs::Gpu(s) => s.tdp,
            _ => None,
        }
    }

    pub fn length_mm(&self) -> Option<u32> {
        match self {
            Specs::Gpu(s) => s.length_mm,
            _ => None,
        }
    }

    pub fn max_gpu_length(&self) -> Option<u32> {
        match self {
            Specs::Case(s) => s.max_gpu_length,
            _ => None,
        }
    }

    pub fn wattage(&self) -> Option<u32> {
        match self {
            Specs::Psu(s) => s.wattage,
            _ => None,
        }
    }

    pub fn perf_class(&self) -> Option<PerfClass> {
        match self {
            Specs::Cpu(s) => s.perf_class,
            Specs::Gpu(s) => s.perf_class,
            _ => None,
        }
    }

    /// One-line summary of the known fields, e.g. `AM5 | 6C/12T | 3.8GHz`.
    pub fn summary(&self) -> String {
        let fields: Vec<String> = match self {
            Specs::Cpu(s) => vec![
                s.socket.clone(),
                match (s.cores, s.threads) {
                    (Some(c), Some(t)) => Some(format!("{c}C/{t}T")),
                    (Some(c), None) => Some(format!("{c}C")),
                    _ => None,
                },
                s.base_clock.clone(),
            ],
            Specs::Cooler(s) => vec![
                s.kind.clone(),
                s.tdp_rating
                    .map(|w| format!("{w}W TDP"))
                    .or_else(|| s.size.clone()),
            ],
            Specs::Mainboard(s) => vec![
                s.socket.clone(),
                s.chipset.clone(),
                s.form_factor.map(|f| f.to_string()),
                s.memory_type.clone(),
            ],
            Specs::Ram(s) => vec![s.kind.clone(), s.capacity.clone(), s.speed.clone()],
            Specs::Gpu(s) => vec![
                s.chipset.clone(),
                s.memory.clone(),
                s.length_mm.map(|l| format!("{l}mm")),
            ],
            Specs::Ssd(s) => vec![s.capacity.clone(), s.interface.clone()],
            Specs::Psu(s) => vec![s.wattage.map(|w| format!("{w}W")), s.certification.clone()],
            Specs::Case(s) => vec![
                s.form_factor.map(|f| f.to_string()),
                s.max_gpu_length.map(|l| format!("Max GPU: {l}mm")),
            ],
            Specs::Monitor(s) => vec![s.size.clone(), s.resolution.clone(), s.refresh_rate.clone()],
            Specs::GamingGear(s) => vec![
                s.kind.clone(),
                s.switch.clone().or_else(|| s.dpi.map(|d| format!("{d} DPI"))),
            ],
        }
        .into_iter()
        .flatten()
        .collect();

        fields.join(" | ")
    }
}
