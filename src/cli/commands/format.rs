use std::path::Path;

use anyhow::Result;

use super::util::{load_properties, store_properties};
use dotprops::{IndentingPrinter, LineEnding, Properties, StringPrinter, print_tree};

pub(crate) fn cmd_fmt(file: &Path, line_ending: LineEnding, in_place: bool) -> Result<()> {
    let properties = load_properties(file)?;
    if in_place {
        store_properties(file, &properties, line_ending)?;
        println!("formatted {} ({} entries)", file.display(), properties.len());
    } else {
        print!("{}", properties.to_text(line_ending));
    }
    Ok(())
}

pub(crate) fn cmd_tree(file: &Path, indent: usize) -> Result<()> {
    let properties = load_properties(file)?;
    print!("{}", render_tree(&properties, indent));
    Ok(())
}

fn render_tree(properties: &Properties, indent: usize) -> String {
    let mut printer = StringPrinter::new(" ".repeat(indent), LineEnding::Nl);
    printer.indent();
    print_tree(properties, &mut printer);
    printer.finish()
}
