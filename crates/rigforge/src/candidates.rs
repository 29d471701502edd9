use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use rigforge_core::{Category, Part, Tier};
use serde::Serialize;

use crate::catalog::write_parts_table;
use crate::context::Context;
use crate::format::OutputFormat;
use crate::selection::SelectionArgs;

#[derive(Args, Debug, Clone)]
#[command(about = "List parts that fit a slot of the given build")]
pub struct CandidatesArgs {
    /// Slot to open (e.g. cpu, mainboard, ram, gpu, psu, case)
    #[arg(value_name = "SLUG")]
    pub category: Category,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format
    #[arg(short, long, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct CandidatesReport<'a> {
    category: Category,
    tier: Option<Tier>,
    suggestions: &'a [&'a Part],
    compatible: &'a [&'a Part],
    hidden: usize,
}

pub fn execute(args: CandidatesArgs, ctx: &Context) -> Result<()> {
    let mut session = args.selection.session(ctx.catalog()?)?;
    let total = session.catalog().by_category(args.category).len();
    let candidates = session.open(args.category);
    let hidden = total - candidates.compatible.len();

    let mut writer = io::stdout().lock();
    if args.format == OutputFormat::Json {
        let report = CandidatesReport {
            category: candidates.category,
            tier: candidates.tier,
            suggestions: &candidates.suggestions,
            compatible: &candidates.compatible,
            hidden,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    if candidates.is_empty() {
        writeln!(
            writer,
            "{}",
            format!("No compatible {} in the catalog", args.category.label()).yellow()
        )?;
    } else {
        if let Some(tier) = candidates.tier.filter(|_| !candidates.suggestions.is_empty()) {
            writeln!(writer, "{}", format!("Suggested for {tier} builds").bold())?;
            write_parts_table(&candidates.suggestions, ctx, &mut writer)?;
        }
        let others: Vec<&Part> = candidates.others().collect();
        if !others.is_empty() {
            writeln!(writer, "{}", format!("Compatible {}", args.category.label()).bold())?;
            write_parts_table(&others, ctx, &mut writer)?;
        }
    }
    if hidden > 0 {
        writeln!(
            writer,
            "{}",
            format!("{hidden} incompatible part(s) hidden").dimmed()
        )?;
    }
    Ok(())
}
