use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

use crate::report::Snapshot;

pub(super) fn write_xml<W: Write>(snapshot: &Snapshot, out: W) -> Result<()> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    open(&mut writer, "report")?;
    element(&mut writer, "client_id", &snapshot.client_id)?;
    element(&mut writer, "client_name", &snapshot.client_name)?;
    element(
        &mut writer,
        "generated_at",
        &snapshot.generated_at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    )?;

    let summary = &snapshot.summary;
    open(&mut writer, "summary")?;
    element(&mut writer, "income", &summary.income.to_string())?;
    element(&mut writer, "expense", &summary.expense.to_string())?;
    element(&mut writer, "net", &summary.net.to_string())?;
    close(&mut writer, "summary")?;

    open(&mut writer, "categories")?;
    for category in &summary.categories {
        open(&mut writer, "category")?;
        element(&mut writer, "name", &category.name)?;
        element(&mut writer, "total", &category.total.to_string())?;
        close(&mut writer, "category")?;
    }
    close(&mut writer, "categories")?;

    open(&mut writer, "transactions")?;
    for txn in &snapshot.transactions {
        open(&mut writer, "transaction")?;
        element(&mut writer, "date", &txn.date.format("%Y-%m-%d").to_string())?;
        element(&mut writer, "account", &txn.account_id)?;
        element(&mut writer, "bank", &txn.bank)?;
        element(&mut writer, "memo", &txn.memo)?;
        element(&mut writer, "amount", &txn.amount.to_string())?;
        element(&mut writer, "kind", txn.kind.as_str())?;
        element(&mut writer, "category", &txn.category)?;
        close(&mut writer, "transaction")?;
    }
    close(&mut writer, "transactions")?;
    close(&mut writer, "report")?;

    writer
        .get_mut()
        .write_all(b"\n")
        .context("Failed to write XML output")?;
    Ok(())
}

fn open<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn close<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn element<W: Write>(writer: &mut Writer<W>, name: &str, value: &str) -> Result<()> {
    open(writer, name)?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    close(writer, name)
}
