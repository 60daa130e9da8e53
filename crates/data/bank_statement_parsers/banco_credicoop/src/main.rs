use std::{env, fs};

use anyhow::{bail, Context, Result};
use banco_credicoop_parser::reconcile::{reconcile_statements, Journal, JournalResolver};
use banco_credicoop_parser::{CredicoopParser, FileFormat};

/// Resolver for the command line: one journal name covers every account.
struct StaticJournal(String);

impl JournalResolver for StaticJournal {
    fn find_journal(&self, _company: &str, _bank_account: &str) -> Option<Journal> {
        Some(Journal {
            name: self.0.clone(),
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Usage:
    //   banco_credicoop_parser statement.xlsx older.xls ... [options]
    //
    // Options:
    //   --codepage N      codepage for legacy XLS strings (default 1252)
    //   --company NAME    company used for journal resolution
    //   --account NAME    bank account label (default "Banco Credicoop")
    //   --journal NAME    reconcile into ledger records with this journal
    //   --output PATH     write JSON there instead of stdout

    let mut files: Vec<String> = Vec::new();
    let mut codepage: Option<u16> = None;
    let mut company = String::from("Company");
    let mut account = String::from("Banco Credicoop");
    let mut journal: Option<String> = None;
    let mut output: Option<String> = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--codepage" => {
                codepage = Some(
                    args.next()
                        .context("--codepage needs a value")?
                        .parse()
                        .context("--codepage must be a number")?,
                )
            }
            "--company" => company = args.next().context("--company needs a value")?,
            "--account" => account = args.next().context("--account needs a value")?,
            "--journal" => journal = Some(args.next().context("--journal needs a value")?),
            "--output" => output = Some(args.next().context("--output needs a value")?),
            _ => files.push(arg),
        }
    }

    if files.is_empty() {
        bail!("no spreadsheet files given (expected .xls or .xlsx paths)");
    }

    let mut parser = CredicoopParser::new();
    if let Some(cp) = codepage {
        parser = parser.with_codepage(cp);
    }

    let mut results = Vec::new();
    for file in &files {
        let format = format_for(file)?;
        let data = fs::read(file).with_context(|| format!("cannot read {file}"))?;
        let statements = parser
            .parse_bytes(&data, format)
            .with_context(|| format!("cannot import {file}"))?;
        tracing::info!(file = %file, statements = statements.len(), "parsed");

        let rendered = match &journal {
            Some(name) => {
                let records = reconcile_statements(
                    &statements,
                    &StaticJournal(name.clone()),
                    &company,
                    &account,
                )?;
                serde_json::to_value(records)?
            }
            None => serde_json::to_value(&statements)?,
        };
        results.push(serde_json::json!({ "file": file, "statements": rendered }));
    }

    let rendered = serde_json::to_string_pretty(&results)?;
    match output {
        Some(path) => fs::write(&path, rendered).with_context(|| format!("cannot write {path}"))?,
        None => println!("{rendered}"),
    }
    Ok(())
}

fn format_for(path: &str) -> Result<FileFormat> {
    let low = path.to_lowercase();
    if low.ends_with(".xlsx") {
        Ok(FileFormat::Xlsx)
    } else if low.ends_with(".xls") {
        Ok(FileFormat::Xls)
    } else {
        bail!("cannot tell the file format of {path}; expected .xls or .xlsx");
    }
}
