use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color};
use rigforge_core::{Category, Part, classify};

use crate::context::Context;
use crate::format::{self, OutputFormat};

#[derive(Args, Debug, Clone)]
#[command(about = "List catalog parts")]
pub struct CatalogArgs {
    /// Only show parts in this category (e.g. cpu, mainboard, gpu)
    #[arg(short, long, value_name = "SLUG")]
    pub category: Option<Category>,

    /// Only show parts at or below their restock threshold
    #[arg(long)]
    pub low_stock: bool,

    /// Output format
    #[arg(short, long, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

pub fn execute(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let parts = catalog.filter(|part| {
        args.category.is_none_or(|c| part.category == c)
            && (!args.low_stock || part.is_low_stock())
    });

    let mut writer = io::stdout().lock();
    match args.format {
        OutputFormat::Json => writeln!(writer, "{}", serde_json::to_string_pretty(&parts)?)?,
        OutputFormat::Table => write_parts_table(&parts, ctx, &mut writer)?,
    }
    Ok(())
}

fn stock_cell(part: &Part) -> Cell {
    let cell = Cell::new(part.quantity);
    if !part.in_stock() {
        cell.fg(Color::Red)
    } else if part.is_low_stock() {
        cell.fg(Color::Yellow)
    } else {
        cell
    }
}

pub fn write_parts_table<W: Write>(
    parts: &[&Part],
    ctx: &Context,
    mut writer: W,
) -> io::Result<()> {
    let mut table = format::table(["ID", "Name", "Category", "Tier", "Price", "Stock", "Specs"]);
    for part in parts {
        table.add_row(vec![
            Cell::new(part.id),
            Cell::new(&part.name),
            Cell::new(part.category.label()),
            Cell::new(classify(part)),
            Cell::new(ctx.money(part.price)),
            stock_cell(part),
            Cell::new(part.specs.summary()),
        ]);
    }
    writeln!(writer, "{table}")
}
