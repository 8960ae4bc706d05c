use fsapi::{FsapiClient, ListItem};
use prettytable::{format, Cell, Row, Table};

fn create_table(titles: &[&str]) -> Table {
    let mut table = Table::new();
    let fmt = format::FormatBuilder::new()
        .padding(1, 1)
        .separator(
            format::LinePosition::Title,
            format::LineSeparator::new('-', '+', '+', '+'),
        )
        .column_separator('|')
        .build();
    table.set_format(fmt);
    table.set_titles(Row::new(
        titles
            .iter()
            .map(|title| Cell::new_align(title, format::Alignment::CENTER))
            .collect(),
    ));
    table
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        ""
    }
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

pub(crate) fn print_modes(client: &FsapiClient) -> anyhow::Result<()> {
    let current = client.mode()?.map(|mode| mode.key);
    let mut table = create_table(&["key", "id", "label", "selectable", "current"]);
    for mode in client.modes()? {
        let is_current = current.as_deref() == Some(mode.key.as_str());
        table.add_row(Row::new(vec![
            Cell::new_align(&mode.key, format::Alignment::RIGHT),
            Cell::new(&mode.id),
            Cell::new(&mode.label),
            Cell::new(yes_no(mode.selectable.unwrap_or_default())),
            Cell::new(yes_no(is_current)),
        ]));
    }
    table.printstd();
    Ok(())
}

pub(crate) fn print_equalisers(client: &FsapiClient) -> anyhow::Result<()> {
    let current = client.eq_preset()?.map(|eq| eq.key);
    let mut table = create_table(&["key", "label", "current"]);
    for eq in client.equalisers()? {
        let is_current = current.as_deref() == Some(eq.key.as_str());
        table.add_row(Row::new(vec![
            Cell::new_align(&eq.key, format::Alignment::RIGHT),
            Cell::new(&eq.label),
            Cell::new(yes_no(is_current)),
        ]));
    }
    table.printstd();
    Ok(())
}

pub(crate) fn print_presets(client: &FsapiClient) -> anyhow::Result<()> {
    let mut table = create_table(&["key", "type", "name"]);
    for preset in client.presets()? {
        table.add_row(Row::new(vec![
            Cell::new_align(&preset.key.to_string(), format::Alignment::RIGHT),
            Cell::new(preset.kind.as_deref().unwrap_or_default()),
            Cell::new(&preset.name),
        ]));
    }
    table.printstd();
    Ok(())
}

/// Folder entries carry `name`, `type` (0 = folder, 1 = playable item) and
/// `subtype`.
pub(crate) fn print_folder(client: &FsapiClient) -> anyhow::Result<()> {
    let mut table = create_table(&["key", "kind", "name"]);
    let mut n = 0;
    for item in client.nav_list()? {
        let item: ListItem = item?;
        let kind = match item.int("type") {
            Some(0) => "folder",
            Some(_) => "item",
            None => "",
        };
        table.add_row(Row::new(vec![
            Cell::new_align(&item.key, format::Alignment::RIGHT),
            Cell::new(kind),
            Cell::new(item.text("name").unwrap_or_default()),
        ]));
        n += 1;
    }
    tracing::info!("{} entries in {:?}", n, client.nav_path());
    table.printstd();
    Ok(())
}
