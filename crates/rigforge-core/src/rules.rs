//! Hardware compatibility rules.
//!
//! Every rule is a total function of the current [`Build`] and a candidate
//! part. A verdict is either `None` (compatible) or a [`Violation`]. Rules
//! never block a selection: the same predicates pre-filter selection lists
//! and flag already-selected parts that a later change made incompatible.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::build::Build;
use crate::catalog::Catalog;
use crate::part::{Category, Part};
use crate::power::recommended_psu_wattage;
use crate::specs::FormFactor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    SocketMismatch,
    MemoryTypeMismatch,
    FormFactorTooLarge,
    GpuTooLong,
    InsufficientWattage { required: u32 },
}

/// A failed rule: the machine-checkable kind plus its display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    #[serde(flatten)]
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Whether a case of size `case` can hold a mainboard of size `mainboard`.
///
/// An unknown size sorts below every known one.
pub fn is_case_compatible(case: Option<FormFactor>, mainboard: Option<FormFactor>) -> bool {
    case >= mainboard
}

fn socket_rule(candidate: &Part, other: Option<&Part>, other_name: &str) -> Option<Violation> {
    let other = other?;
    (candidate.specs.socket() != other.specs.socket()).then(|| {
        Violation::new(
            ViolationKind::SocketMismatch,
            format!("Socket mismatch with {other_name}!"),
        )
    })
}

fn memory_rule(candidate: &Part, other: Option<&Part>) -> Option<Violation> {
    let other = other?;
    (candidate.specs.memory_type() != other.specs.memory_type())
        .then(|| Violation::new(ViolationKind::MemoryTypeMismatch, "RAM type mismatch!"))
}

fn form_factor_rule(case: &Part, mainboard: &Part) -> Option<Violation> {
    (!is_case_compatible(case.specs.form_factor(), mainboard.specs.form_factor())).then(|| {
        Violation::new(
            ViolationKind::FormFactorTooLarge,
            "Mainboard too large for Case!",
        )
    })
}

fn clearance_rule(gpu: &Part, case: &Part) -> Option<Violation> {
    let length = gpu.specs.length_mm()?;
    let max = case.specs.max_gpu_length()?;
    (length > max).then(|| Violation::new(ViolationKind::GpuTooLong, "GPU too long for Case!"))
}

fn wattage_rule(build: &Build, psu: &Part) -> Option<Violation> {
    let wattage = psu.specs.wattage()?;
    let required = recommended_psu_wattage(build);
    (wattage < required).then(|| {
        Violation::new(
            ViolationKind::InsufficientWattage { required },
            format!("Wattage might be insufficient! (Recommended: {required}W+)"),
        )
    })
}

/// Evaluate `candidate` for the `category` slot against every other filled
/// slot of `build`. Whatever currently occupies `category` itself is ignored.
/// The first failing rule wins.
pub fn check(build: &Build, category: Category, candidate: &Part) -> Option<Violation> {
    let cpu = build.get(Category::Cpu);
    let mainboard = build.get(Category::Mainboard);
    let ram = build.get(Category::Ram);
    let gpu = build.get(Category::Gpu);
    let case = build.get(Category::Case);

    match category {
        Category::Cpu => socket_rule(candidate, mainboard, "Mainboard"),
        Category::Mainboard => socket_rule(candidate, cpu, "CPU")
            .or_else(|| memory_rule(candidate, ram))
            .or_else(|| case.and_then(|case| form_factor_rule(case, candidate))),
        Category::Ram => memory_rule(candidate, mainboard),
        Category::Gpu => case.and_then(|case| clearance_rule(candidate, case)),
        Category::Case => mainboard
            .and_then(|mb| form_factor_rule(candidate, mb))
            .or_else(|| gpu.and_then(|gpu| clearance_rule(gpu, candidate))),
        Category::Psu => wattage_rule(build, candidate),
        Category::Cooler | Category::Ssd | Category::Monitor | Category::GamingGear => None,
    }
}

/// Catalog parts of `category` that pass [`check`] against `build`, in
/// catalog order.
pub fn compatible_candidates<'a>(
    catalog: &'a Catalog,
    build: &Build,
    category: Category,
) -> Vec<&'a Part> {
    catalog
        .by_category(category)
        .into_iter()
        .filter(|part| check(build, category, part).is_none())
        .collect()
}

/// Verdict for every filled slot against the rest of the build.
pub fn warnings(build: &Build) -> BTreeMap<Category, Violation> {
    build
        .iter()
        .filter_map(|(category, part)| check(build, category, part).map(|v| (category, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::RawPart;
    use serde_json::json;

    fn part(id: u64, category: &str, specs: serde_json::Value) -> Part {
        let raw: RawPart = serde_json::from_value(json!({
            "id": id, "name": format!("{category} {id}"), "category": category,
            "price": "1000", "quantity": 1, "specs": specs
        }))
        .unwrap();
        Part::from_raw(raw).unwrap()
    }

    #[test]
    fn case_compatibility_follows_form_factor_order() {
        for case in FormFactor::ALL {
            assert!(is_case_compatible(Some(case), Some(FormFactor::Itx)));
            assert!(is_case_compatible(Some(FormFactor::EAtx), Some(case)));
            for board in FormFactor::ALL {
                assert_eq!(is_case_compatible(Some(case), Some(board)), case >= board);
            }
        }
        assert!(!is_case_compatible(Some(FormFactor::MAtx), Some(FormFactor::Atx)));
        assert!(is_case_compatible(Some(FormFactor::Itx), None));
        assert!(!is_case_compatible(None, Some(FormFactor::Itx)));
    }

    #[test]
    fn socket_is_checked_from_both_sides() {
        let mut build = Build::new();
        build.insert(part(1, "CPU", json!({"socket": "AM5"})));

        let lga = part(2, "Mainboard", json!({"socket": "LGA1700"}));
        let am5 = part(3, "Mainboard", json!({"socket": "AM5"}));
        assert_eq!(
            check(&build, Category::Mainboard, &lga).map(|v| v.kind),
            Some(ViolationKind::SocketMismatch)
        );
        assert!(check(&build, Category::Mainboard, &am5).is_none());

        let mut build = Build::new();
        build.insert(lga);
        let cpu = part(4, "CPU", json!({"socket": "AM5"}));
        let violation = check(&build, Category::Cpu, &cpu).unwrap();
        assert_eq!(violation.kind, ViolationKind::SocketMismatch);
        assert_eq!(violation.to_string(), "Socket mismatch with Mainboard!");
    }

    #[test]
    fn memory_type_is_checked_from_both_sides() {
        let mut build = Build::new();
        build.insert(part(1, "RAM", json!({"type": "DDR4"})));
        let board = part(2, "Mainboard", json!({"memory_type": "DDR5"}));
        assert_eq!(
            check(&build, Category::Mainboard, &board).map(|v| v.kind),
            Some(ViolationKind::MemoryTypeMismatch)
        );

        let mut build = Build::new();
        build.insert(board);
        let ddr5 = part(3, "RAM", json!({"type": "DDR5"}));
        let ddr4 = part(4, "RAM", json!({"type": "DDR4"}));
        assert!(check(&build, Category::Ram, &ddr5).is_none());
        assert!(check(&build, Category::Ram, &ddr4).is_some());
    }

    #[test]
    fn first_violation_wins() {
        let mut build = Build::new();
        build.insert(part(1, "CPU", json!({"socket": "AM4"})));
        build.insert(part(2, "RAM", json!({"type": "DDR4"})));
        let board = part(3, "Mainboard", json!({"socket": "AM5", "memory_type": "DDR5"}));
        assert_eq!(
            check(&build, Category::Mainboard, &board).map(|v| v.kind),
            Some(ViolationKind::SocketMismatch)
        );
    }

    #[test]
    fn case_rules() {
        let mut build = Build::new();
        build.insert(part(1, "Mainboard", json!({"form_factor": "ATX"})));
        build.insert(part(2, "GPU", json!({"length_mm": 340})));

        let small = part(3, "Case", json!({"form_factor": "M-ATX", "max_gpu_length": 400}));
        let short = part(4, "Case", json!({"form_factor": "ATX", "max_gpu_length": 300}));
        let roomy = part(5, "Case", json!({"form_factor": "E-ATX", "max_gpu_length": 400}));
        let unknown = part(6, "Case", json!({"form_factor": "E-ATX"}));

        assert_eq!(
            check(&build, Category::Case, &small).map(|v| v.kind),
            Some(ViolationKind::FormFactorTooLarge)
        );
        assert_eq!(
            check(&build, Category::Case, &short).map(|v| v.kind),
            Some(ViolationKind::GpuTooLong)
        );
        assert!(check(&build, Category::Case, &roomy).is_none());
        assert!(check(&build, Category::Case, &unknown).is_none());
    }

    #[test]
    fn psu_needs_headroom() {
        let mut build = Build::new();
        build.insert(part(1, "CPU", json!({"tdp": 65})));
        build.insert(part(2, "GPU", json!({"tdp": 200})));
        // 80 + 65 + 200 + 150
        let weak = part(3, "PSU", json!({"wattage": 494}));
        let exact = part(4, "PSU", json!({"wattage": 495}));
        let unrated = part(5, "PSU", json!({}));

        let violation = check(&build, Category::Psu, &weak).unwrap();
        assert_eq!(violation.kind, ViolationKind::InsufficientWattage { required: 495 });
        assert_eq!(
            violation.message,
            "Wattage might be insufficient! (Recommended: 495W+)"
        );
        assert!(check(&build, Category::Psu, &exact).is_none());
        assert!(check(&build, Category::Psu, &unrated).is_none());
    }

    #[test]
    fn warnings_flag_both_sides_without_removing() {
        let mut build = Build::new();
        build.insert(part(1, "GPU", json!({"length_mm": 340})));
        build.insert(part(2, "Case", json!({"max_gpu_length": 300})));
        build.insert(part(3, "SSD", json!({})));

        let warnings = warnings(&build);
        assert_eq!(warnings[&Category::Gpu].kind, ViolationKind::GpuTooLong);
        assert_eq!(warnings[&Category::Case].kind, ViolationKind::GpuTooLong);
        assert!(!warnings.contains_key(&Category::Ssd));
        assert_eq!(build.len(), 3);
    }

    #[test]
    fn violations_serialize_with_kind_tag() {
        let violation = Violation::new(
            ViolationKind::InsufficientWattage { required: 500 },
            "Wattage might be insufficient! (Recommended: 500W+)",
        );
        insta::assert_json_snapshot!(violation, @r#"
        {
          "kind": "insufficient_wattage",
          "required": 500,
          "message": "Wattage might be insufficient! (Recommended: 500W+)"
        }
        "#);
    }
}
