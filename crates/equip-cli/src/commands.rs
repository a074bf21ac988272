use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info_span;

use equip_cli::session::{ReportFormat, ReportOutput, Session};

use crate::cli::{DeleteArgs, ReportArgs, ReportFormatArg, ShowArgs, UploadArgs};
use crate::summary::{print_dataset, print_deleted, print_history, print_summary};

pub fn run_upload(session: &Session, args: &UploadArgs) -> Result<()> {
    let span = info_span!("cli_upload", file = %args.file.display());
    let _guard = span.enter();
    let dataset = session.upload(&args.file, args.name.as_deref())?;
    println!(
        "Stored {} record(s) from \"{}\"",
        dataset.records.len(),
        dataset.filename
    );
    print_dataset(&dataset, false);
    Ok(())
}

pub fn run_history(session: &Session) -> Result<()> {
    print_history(&session.history());
    Ok(())
}

pub fn run_show(session: &Session, args: &ShowArgs) -> Result<()> {
    if args.records {
        print_dataset(&*session.dataset(args.id)?, true);
    } else {
        print_summary(&session.summary(args.id)?);
    }
    Ok(())
}

pub fn run_report(session: &Session, args: &ReportArgs) -> Result<()> {
    let format = match args.format {
        ReportFormatArg::Text => ReportFormat::Text,
        ReportFormatArg::Json => ReportFormat::Json,
    };
    match session.report(args.id, format, args.output.as_deref())? {
        ReportOutput::File(path) => println!("Report written to {}", path.display()),
        ReportOutput::Bytes(bytes) => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(&bytes)
                .and_then(|()| stdout.flush())
                .context("failed to write report to stdout")?;
        }
    }
    Ok(())
}

pub fn run_delete(session: &Session, args: &DeleteArgs) -> Result<()> {
    print_deleted(&session.delete(args.id)?);
    Ok(())
}

pub fn run_whoami(session: &Session) -> Result<()> {
    println!("{}", session.whoami()?);
    Ok(())
}
