use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use comfy_table::{Cell, Color};
use rigforge_core::power::{FpsRating, recommended_psu_wattage};
use rigforge_core::{BuildSession, Category, GameProfile, Part, Tier, Violation, predict_fps, share};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::context::Context;
use crate::format::{self, OutputFormat};
use crate::selection::SelectionArgs;

#[derive(Args, Debug, Clone)]
#[command(about = "Assemble a build and show its compatibility, power and cost")]
pub struct BuildArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format
    #[arg(short, long, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct SlotReport<'a> {
    category: Category,
    part: Option<&'a Part>,
    warning: Option<&'a Violation>,
}

#[derive(Serialize)]
struct FpsReport {
    game: &'static str,
    fps: u32,
    rating: FpsRating,
}

#[derive(Serialize)]
struct BuildReport<'a> {
    tier: Option<Tier>,
    slots: Vec<SlotReport<'a>>,
    total_price: Decimal,
    total_wattage: u32,
    recommended_psu_wattage: u32,
    fps: Vec<FpsReport>,
    progress: f64,
    share_code: Option<String>,
}

impl<'a> BuildReport<'a> {
    fn new(session: &'a BuildSession) -> Self {
        let build = session.build();
        let slots = Category::ALL
            .into_iter()
            .map(|category| SlotReport {
                category,
                part: build.get(category),
                warning: session.warnings().get(&category),
            })
            .collect();
        let fps = GameProfile::ALL
            .into_iter()
            .map(|profile| {
                let fps = predict_fps(build, profile);
                FpsReport {
                    game: profile.title(),
                    fps,
                    rating: FpsRating::for_fps(profile, fps),
                }
            })
            .collect();

        Self {
            tier: session.active_tier(),
            slots,
            total_price: session.total_price(),
            total_wattage: session.total_wattage(),
            recommended_psu_wattage: recommended_psu_wattage(build),
            fps,
            progress: session.progress(),
            share_code: share::encode(build),
        }
    }
}

pub fn execute(args: BuildArgs, ctx: &Context) -> Result<()> {
    let session = args.selection.session(ctx.catalog()?)?;
    let report = BuildReport::new(&session);

    let mut writer = io::stdout().lock();
    match args.format {
        OutputFormat::Json => writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?,
        OutputFormat::Table => write_report(&report, ctx, &mut writer)?,
    }
    Ok(())
}

fn write_report<W: Write>(report: &BuildReport, ctx: &Context, mut writer: W) -> io::Result<()> {
    let mut table = format::table(["Slot", "Part", "Price", "Compatibility"]);
    for slot in &report.slots {
        let (name, price) = match slot.part {
            Some(part) => (Cell::new(&part.name), Cell::new(ctx.money(part.price))),
            None => (Cell::new("-").fg(Color::DarkGrey), Cell::new("")),
        };
        let status = match (slot.part, slot.warning) {
            (_, Some(violation)) => Cell::new(&violation.message).fg(Color::Red),
            (Some(_), None) => Cell::new("OK").fg(Color::Green),
            (None, None) => Cell::new(""),
        };
        table.add_row(vec![Cell::new(slot.category.label()), name, price, status]);
    }
    writeln!(writer, "{table}")?;

    if let Some(tier) = report.tier {
        writeln!(writer, "Preset tier:     {tier}")?;
    }
    writeln!(
        writer,
        "Total:           {}",
        ctx.money(report.total_price).bold()
    )?;
    writeln!(
        writer,
        "Estimated draw:  {}W (PSU {}W+ recommended)",
        report.total_wattage, report.recommended_psu_wattage
    )?;
    for fps in &report.fps {
        writeln!(writer, "{:<17}{} FPS ({})", format!("{}:", fps.game), fps.fps, fps.rating)?;
    }
    writeln!(writer, "Progress:        {:.0}%", report.progress * 100.0)?;
    if let Some(code) = &report.share_code {
        writeln!(writer, "Share code:      {code}")?;
    }

    let warnings = report.slots.iter().filter(|s| s.warning.is_some()).count();
    if warnings > 0 {
        writeln!(
            writer,
            "{}",
            format!("{warnings} compatibility warning(s)").yellow()
        )?;
    }
    Ok(())
}
