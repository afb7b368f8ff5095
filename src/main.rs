use recon::prelude::*;

fn main() {
    CliApp::new("recon")
        .with_args(CliArgs::parse)
        .run(run_reconciliation);
}

/// Reconcile the ledger against every statement file and print the report
async fn run_reconciliation(mut writers: Writers, args: CliArgs) -> Result<(), AppError> {
    let config = ReconConfig::from_env()?;
    args.validate()?;

    let window = ReconciliationWindow::from_dates(args.start, args.end, config.utc_offset)?;

    let reconciliation = args.statements.iter().fold(
        Reconciliation::<FixedPoint>::new(window).with_transaction_file(&args.transactions),
        |recon, path| recon.add_statement_file(path),
    );

    // Any failure propagates before the report is written
    let report = config.configure(reconciliation).run().await?;

    write_report(&report, &mut writers.stdout).await?;

    Ok(())
}
