//! PC build compatibility engine.
//!
//! The crate models a custom-PC configurator on top of a read-only parts
//! catalog. Apart from the [`catalog::PartSource`] seam it performs no I/O;
//! every operation below is a synchronous transform over in-memory data:
//!
//! * [`catalog`]: loads [`Part`]s once and indexes them by [`Category`].
//! * [`rules`]: pure compatibility predicates returning a [`Violation`].
//! * [`session`]: the per-user [`BuildSession`] holding one part per slot.
//! * [`tier`]: price tiers and the greedy preset picker.
//! * [`power`]: wattage and FPS estimates.
//! * [`share`]: base64 share codes for builds.
//! * [`checkout`]: the order draft handed to the order collaborator.

pub mod build;
pub mod catalog;
pub mod checkout;
mod lenient;
pub mod part;
pub mod power;
pub mod rules;
pub mod session;
pub mod share;
pub mod specs;
pub mod tier;

pub use build::Build;
pub use catalog::{Catalog, CatalogError, JsonFileSource, PartSource, parse_rows};
pub use checkout::{ASSEMBLY_FEE, CheckoutError, Customer, OrderDraft, OrderRequest};
pub use part::{Category, Part, RawPart};
pub use power::{GameProfile, predict_fps, total_wattage};
pub use rules::{Violation, ViolationKind};
pub use session::{BuildError, BuildSession, Candidates};
pub use specs::{FormFactor, PerfClass, Specs};
pub use tier::{GamePreset, Tier, apply_preset, classify};
