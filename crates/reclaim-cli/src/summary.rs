use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use reclaim_cli::pipeline::{MatchReport, TruncationReport};
use reclaim_match::truncation::ending;
use reclaim_model::RuleKind;

pub fn print_summary(report: &MatchReport) {
    let outcome = &report.outcome;
    println!(
        "Reference: {} records, incomplete: {} records, patterns: {}",
        report.reference_records, report.incomplete_records, report.patterns
    );
    match &report.outputs {
        Some(paths) => {
            println!("Matched: {}", paths.matched.display());
            println!("Unmatched: {}", paths.unmatched.display());
        }
        None => println!("Dry run: no files written"),
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Rule"), header_cell("Resolved")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for kind in RuleKind::ALL {
        let count = outcome.stats.by_rule.get(&kind).copied().unwrap_or(0);
        table.add_row(vec![Cell::new(kind.as_str()), count_cell(count, Color::Green)]);
    }
    table.add_row(vec![
        Cell::new("MATCHED")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        count_cell(outcome.matched.len(), Color::Green).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("UNMATCHED")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        count_cell(outcome.unmatched.len(), Color::Red).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("NEEDS REVIEW")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        count_cell(outcome.stats.needs_review, Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    if outcome.stats.duplicate_ids > 0 {
        table.add_row(vec![
            dim_cell("duplicate ids dropped"),
            count_cell(outcome.stats.duplicate_ids, Color::Yellow),
        ]);
    }
    println!("{table}");
    print_review_table(report);
    print_unmatched_table(report);
    println!("Finished in {:.2?}", report.elapsed);
}

fn print_review_table(report: &MatchReport) {
    let flagged: Vec<_> = report
        .outcome
        .matched
        .iter()
        .filter(|result| result.needs_review)
        .collect();
    if flagged.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Rule"),
        header_cell("Row"),
        header_cell("Candidates"),
        header_cell("Source"),
    ]);
    apply_detail_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for result in flagged {
        table.add_row(vec![
            Cell::new(result.id.as_str()),
            Cell::new(result.rule.as_str()),
            Cell::new(result.reference_row),
            count_cell(result.candidates, Color::Yellow),
            Cell::new(&result.source_url),
        ]);
    }
    println!();
    println!("Needs review (several distinct references qualified):");
    println!("{table}");
}

fn print_unmatched_table(report: &MatchReport) {
    if report.outcome.unmatched.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Module"),
        header_cell("Ends with"),
    ]);
    apply_detail_table_style(&mut table);
    for record in &report.outcome.unmatched {
        table.add_row(vec![
            Cell::new(record.id.as_str()),
            optional_cell(record.module_title.as_deref()),
            dim_cell(ending(&record.truncated_text)),
        ]);
    }
    println!();
    println!("Unmatched:");
    println!("{table}");
}

pub fn print_check(report: &TruncationReport) {
    println!(
        "Truncated: {} / {} records",
        report.truncated.len(),
        report.total
    );
    if !report.truncated.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Id"),
            header_cell("Module"),
            header_cell("Ends with"),
        ]);
        apply_detail_table_style(&mut table);
        for record in &report.truncated {
            table.add_row(vec![
                Cell::new(&record.id),
                optional_cell(record.module_title.as_deref()),
                Cell::new(&record.ending).fg(Color::Yellow),
            ]);
        }
        println!("{table}");
    }
    if report.endings.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Ending"), header_cell("Records")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (text, count) in &report.endings {
        table.add_row(vec![Cell::new(format!("{text:?}")), Cell::new(count)]);
    }
    println!();
    println!("Common endings:");
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn apply_detail_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(28)),
            ColumnConstraint::UpperBoundary(Width::Fixed(20)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(text) => Cell::new(text),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
