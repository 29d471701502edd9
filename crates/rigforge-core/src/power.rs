//! Power draw and FPS estimates.
//!
//! Both are coarse heuristics for the build summary, not measurements. When a
//! part carries no explicit `perf_class`, its class is guessed from model-name
//! markers, which only knows the product lines listed below.

use std::fmt;

use serde::Serialize;

use crate::build::Build;
use crate::part::{Category, Part};
use crate::specs::PerfClass;

/// Mainboard, fans and storage.
pub const BASE_WATTS: u32 = 80;
/// Transient cushion required on top of the estimated draw when sizing a PSU.
pub const PSU_HEADROOM_WATTS: u32 = 150;

const FLAGSHIP_CPU_WATTS: u32 = 50;
const FLAGSHIP_GPU_WATTS: u32 = 100;

// Checked in order, so the most specific / highest class comes first.
const CPU_MARKERS: &[(&str, PerfClass)] = &[
    ("i9", PerfClass::Flagship),
    ("ryzen 9", PerfClass::Flagship),
    ("i7", PerfClass::Performance),
    ("ryzen 7", PerfClass::Performance),
    ("i5", PerfClass::Mainstream),
    ("ryzen 5", PerfClass::Mainstream),
    ("i3", PerfClass::Entry),
    ("ryzen 3", PerfClass::Entry),
];

const GPU_MARKERS: &[(&str, PerfClass)] = &[
    ("4090", PerfClass::Flagship),
    ("7900", PerfClass::Flagship),
    ("rtx 4080", PerfClass::Performance),
    ("rtx 4070", PerfClass::Performance),
    ("rtx 4060", PerfClass::Mainstream),
    ("rtx 3060", PerfClass::Mainstream),
    ("gtx", PerfClass::Entry),
    ("rx 6400", PerfClass::Entry),
];

fn class_from_markers(name: &str, markers: &[(&str, PerfClass)]) -> Option<PerfClass> {
    let name = name.to_lowercase();
    markers
        .iter()
        .find(|(marker, _)| name.contains(marker))
        .map(|&(_, class)| class)
}

/// Performance class of a CPU or GPU part; `None` for other categories or
/// unrecognised models.
pub fn perf_class(part: &Part) -> Option<PerfClass> {
    let markers = match part.category {
        Category::Cpu => CPU_MARKERS,
        Category::Gpu => GPU_MARKERS,
        _ => return None,
    };
    part.specs
        .perf_class()
        .or_else(|| class_from_markers(&part.name, markers))
}

fn is_flagship(part: Option<&Part>) -> bool {
    part.and_then(perf_class) == Some(PerfClass::Flagship)
}

/// Estimated system draw in watts.
pub fn total_wattage(build: &Build) -> u32 {
    let cpu = build.get(Category::Cpu);
    let gpu = build.get(Category::Gpu);

    // Saturates: catalog tdp values are not range-checked.
    let mut watts = BASE_WATTS
        .saturating_add(cpu.and_then(|p| p.specs.tdp()).unwrap_or(0))
        .saturating_add(gpu.and_then(|p| p.specs.tdp()).unwrap_or(0));

    if is_flagship(cpu) {
        watts = watts.saturating_add(FLAGSHIP_CPU_WATTS);
    }
    if is_flagship(gpu) {
        watts = watts.saturating_add(FLAGSHIP_GPU_WATTS);
    }
    watts
}

/// Smallest PSU rating that doesn't trigger a wattage warning.
pub fn recommended_psu_wattage(build: &Build) -> u32 {
    total_wattage(build).saturating_add(PSU_HEADROOM_WATTS)
}

/// Workload shape for [`predict_fps`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameProfile {
    /// CPU-bound competitive shooter (VALORANT-like).
    Esports,
    /// GPU-bound open-world title (Cyberpunk-like).
    Aaa,
}

impl GameProfile {
    pub const ALL: [GameProfile; 2] = [GameProfile::Esports, GameProfile::Aaa];

    pub fn title(self) -> &'static str {
        match self {
            GameProfile::Esports => "VALORANT",
            GameProfile::Aaa => "Cyberpunk 2077",
        }
    }
}

impl fmt::Display for GameProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

const ESPORTS_BASELINE_FPS: u32 = 150;

/// CPU scaling for esports titles, in tenths.
fn cpu_multiplier_tenths(class: Option<PerfClass>) -> u32 {
    match class {
        Some(PerfClass::Flagship) => 30,
        Some(PerfClass::Performance) => 25,
        Some(PerfClass::Mainstream) => 18,
        Some(PerfClass::Entry) | None => 10,
    }
}

fn gpu_esports_bonus(class: Option<PerfClass>) -> u32 {
    match class {
        Some(PerfClass::Flagship) => 200,
        Some(PerfClass::Performance) => 150,
        Some(PerfClass::Mainstream) => 100,
        Some(PerfClass::Entry) => 20,
        None => 0,
    }
}

fn gpu_aaa_fps(class: Option<PerfClass>) -> u32 {
    match class {
        Some(PerfClass::Flagship) => 120,
        Some(PerfClass::Performance) => 90,
        Some(PerfClass::Mainstream) => 60,
        Some(PerfClass::Entry) => 25,
        None => 0,
    }
}

/// Predicted average FPS. Zero until both a CPU and a GPU are selected.
pub fn predict_fps(build: &Build, profile: GameProfile) -> u32 {
    let (Some(cpu), Some(gpu)) = (build.get(Category::Cpu), build.get(Category::Gpu)) else {
        return 0;
    };
    let cpu_class = perf_class(cpu);
    let gpu_class = perf_class(gpu);

    match profile {
        GameProfile::Esports => {
            ESPORTS_BASELINE_FPS * cpu_multiplier_tenths(cpu_class) / 10
                + gpu_esports_bonus(gpu_class)
        }
        GameProfile::Aaa => gpu_aaa_fps(gpu_class),
    }
}

/// How a predicted frame rate feels for the given profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FpsRating {
    Low,
    Playable,
    Good,
    Excellent,
}

impl FpsRating {
    pub fn for_fps(profile: GameProfile, fps: u32) -> Self {
        match profile {
            GameProfile::Esports if fps > 240 => FpsRating::Excellent,
            GameProfile::Esports if fps > 144 => FpsRating::Good,
            GameProfile::Esports => FpsRating::Low,
            GameProfile::Aaa if fps >= 60 => FpsRating::Good,
            GameProfile::Aaa if fps >= 30 => FpsRating::Playable,
            GameProfile::Aaa => FpsRating::Low,
        }
    }
}

impl fmt::Display for FpsRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FpsRating::Low => write!(f, "low"),
            FpsRating::Playable => write!(f, "playable"),
            FpsRating::Good => write!(f, "good"),
            FpsRating::Excellent => write!(f, "excellent"),
        }
    }
}
