use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use dialoguer::Select;
use tubekit_core::{
    ExportFormat, GenerationClient, GenerationOptions, GenerationRequest, Pipeline, SessionState,
    format::format_history_entry,
};

use crate::{export, generate, print_results};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuChoice {
    SelectTitle,
    ShowDescription,
    Export,
    History,
    GenerateAgain,
    ClearAll,
    Quit,
}

impl MenuChoice {
    const ALL: [MenuChoice; 7] = [
        MenuChoice::SelectTitle,
        MenuChoice::ShowDescription,
        MenuChoice::Export,
        MenuChoice::History,
        MenuChoice::GenerateAgain,
        MenuChoice::ClearAll,
        MenuChoice::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuChoice::SelectTitle => "Select a title",
            MenuChoice::ShowDescription => "Show description",
            MenuChoice::Export => "Export results",
            MenuChoice::History => "Show history",
            MenuChoice::GenerateAgain => "Generate again",
            MenuChoice::ClearAll => "Clear all",
            MenuChoice::Quit => "Quit",
        }
    }
}

/// Post-generation menu over a live session. Esc or "Quit" leaves.
pub(crate) async fn run<C: GenerationClient>(
    pipeline: &Pipeline<C>,
    session: &mut SessionState,
    request: &GenerationRequest,
    options: &GenerationOptions,
    output_dir: &Path,
    default_format: ExportFormat,
) -> Result<()> {
    let items: Vec<&str> = MenuChoice::ALL.iter().map(|choice| choice.label()).collect();

    loop {
        println!();
        let selection = Select::new()
            .with_prompt("What next?")
            .items(&items)
            .default(0)
            .interact_opt()
            .context("Menu selection failed")?;

        let Some(index) = selection else {
            return Ok(());
        };

        match MenuChoice::ALL[index] {
            MenuChoice::SelectTitle => select_title(session)?,
            MenuChoice::ShowDescription => show_description(session),
            MenuChoice::Export => {
                if let Some(format) = prompt_export_format(default_format)? {
                    export(session, format, output_dir).await?;
                }
            }
            MenuChoice::History => show_history(session),
            MenuChoice::GenerateAgain => {
                generate(pipeline, session, request, options).await?;
                print_results(session);
            }
            MenuChoice::ClearAll => {
                session.clear();
                println!("{} Results cleared", style("✓").green().bold());
            }
            MenuChoice::Quit => return Ok(()),
        }
    }
}

fn select_title(session: &mut SessionState) -> Result<()> {
    if session.titles.is_empty() {
        println!("{} No titles generated yet", style("!").yellow().bold());
        return Ok(());
    }

    let items: Vec<String> = session
        .titles
        .iter()
        .enumerate()
        .map(|(i, title)| format!("{}. {}", i + 1, title))
        .collect();
    let default = session
        .selected_title
        .as_ref()
        .and_then(|chosen| session.titles.iter().position(|t| t == chosen))
        .unwrap_or(0);

    let Some(index) = Select::new()
        .with_prompt("Choose a title")
        .items(&items)
        .default(default)
        .interact_opt()
        .context("Title selection failed")?
    else {
        return Ok(());
    };

    let title = session.select_title(index + 1)?;
    println!("{} Selected: {}", style("✓").green().bold(), style(title).bold());
    Ok(())
}

fn show_description(session: &SessionState) {
    if session.description.is_empty() {
        println!("{} No description generated yet", style("!").yellow().bold());
        return;
    }
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", session.description);
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}",
        style("Select the text above to copy it into YouTube Studio.").dim()
    );
}

fn prompt_export_format(default_format: ExportFormat) -> Result<Option<ExportFormat>> {
    let items: Vec<String> = ExportFormat::ALL.iter().map(|f| f.to_string()).collect();
    let default = ExportFormat::ALL
        .iter()
        .position(|f| *f == default_format)
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Export format")
        .items(&items)
        .default(default)
        .interact_opt()
        .context("Format selection failed")?;

    Ok(selection.map(|index| ExportFormat::ALL[index]))
}

fn show_history(session: &SessionState) {
    let entries: Vec<String> = session
        .recent_history()
        .enumerate()
        .map(|(i, entry)| format_history_entry(i + 1, entry))
        .collect();

    if entries.is_empty() {
        println!("{}", style("No generation history yet.").dim());
        return;
    }

    println!("{}", style("Recent generations").bold());
    for entry in entries {
        println!("{}", entry);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn menu_labels_are_unique_and_end_with_quit() {
        assert_eq!(MenuChoice::ALL.last(), Some(&MenuChoice::Quit));
        let labels: HashSet<&str> = MenuChoice::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels.len(), MenuChoice::ALL.len());
    }
}
