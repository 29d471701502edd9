use std::io::{self, Write};

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;
use comfy_table::Cell;
use rigforge_core::{Customer, OrderDraft, OrderRequest};

use crate::context::Context;
use crate::format;
use crate::selection::SelectionArgs;

#[derive(Args, Debug, Clone)]
#[command(about = "Place an order for a build")]
pub struct CheckoutArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Customer name
    #[arg(long)]
    pub name: String,

    /// Delivery address
    #[arg(long)]
    pub address: String,

    /// Tax id for the invoice
    #[arg(long, value_name = "ID", default_value = "")]
    pub tax_id: String,

    /// Print the order instead of submitting it
    #[arg(long)]
    pub dry_run: bool,
}

pub fn execute(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let session = args.selection.session(ctx.catalog()?)?;

    let draft = OrderDraft::from_build(session.build())?;
    draft.check_stock()?;
    let request = OrderRequest::new(
        &draft,
        Customer {
            name: args.name,
            tax_id: args.tax_id,
            address: args.address,
        },
    )?;

    let mut writer = io::stdout().lock();
    write_draft(&draft, ctx, &mut writer)?;
    for violation in session.warnings().values() {
        eprintln!("{} {violation}", "Warning:".yellow());
    }

    if args.dry_run {
        writeln!(writer, "{}", serde_json::to_string_pretty(&request)?)?;
        return Ok(());
    }

    let receipt = ctx
        .client()?
        .submit_order(&request)
        .context("Checkout failed")?;
    writeln!(
        writer,
        "{} {}",
        format!("Order #{} placed.", receipt.order_id).green().bold(),
        receipt.message
    )?;
    Ok(())
}

fn write_draft<W: Write>(draft: &OrderDraft, ctx: &Context, mut writer: W) -> io::Result<()> {
    let mut table = format::table(["ID", "Part", "Category", "Price"]);
    for item in &draft.items {
        table.add_row(vec![
            Cell::new(item.id),
            Cell::new(&item.name),
            Cell::new(item.category.label()),
            Cell::new(ctx.money(item.price)),
        ]);
    }
    writeln!(writer, "{table}")?;
    writeln!(writer, "Subtotal:      {}", ctx.money(draft.subtotal))?;
    writeln!(writer, "Assembly fee:  {}", ctx.money(draft.assembly_fee))?;
    writeln!(writer, "Total:         {}", ctx.money(draft.total).bold())?;
    Ok(())
}
