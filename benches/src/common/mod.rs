use std::fs;
use std::path::{Path, PathBuf};

/// Generate a ledger of `num_transactions` rows, all inside January 2024
///
/// Every fourth row is a credit so both sign conventions are exercised.
pub fn generate_ledger_csv(num_transactions: usize) -> String {
    let mut csv = String::from("trxID,amount,type,transactionTime\n");
    for i in 0..num_transactions {
        let kind = if i % 4 == 0 { "CREDIT" } else { "DEBIT" };
        let day = (i % 28) + 1;
        csv.push_str(&format!(
            "TX{i},{}.{:02},{kind},2024-01-{day:02}T{:02}:00:00+07:00\n",
            (i % 1000) + 1,
            i % 100,
            i % 24
        ));
    }
    csv
}

/// Generate one bank's statements covering every `num_banks`-th ledger row
///
/// `match_ratio` of the rows reference a ledger id; the rest are bank-only.
pub fn generate_statement_csv(
    num_transactions: usize,
    bank_index: usize,
    num_banks: usize,
    match_ratio: f64,
) -> String {
    let mut csv = String::from("unique_identifier,amount,date\n");
    let rows: Vec<usize> = (bank_index..num_transactions).step_by(num_banks).collect();
    let matched = (rows.len() as f64 * match_ratio) as usize;

    for (n, i) in rows.into_iter().enumerate() {
        let day = (i % 28) + 1;
        let id = if n < matched {
            format!("TX{i}")
        } else {
            format!("BANK{bank_index}-{i}")
        };
        csv.push_str(&format!(
            "{id},{}.{:02},2024-01-{day:02}\n",
            (i % 1000) + 1,
            i % 100
        ));
    }
    csv
}

/// Write a ledger plus `num_banks` statement files into `dir`
pub fn write_fixture(
    dir: &Path,
    num_transactions: usize,
    num_banks: usize,
    match_ratio: f64,
) -> std::io::Result<(PathBuf, Vec<PathBuf>)> {
    let ledger = dir.join("transactions.csv");
    fs::write(&ledger, generate_ledger_csv(num_transactions))?;

    let statements = (0..num_banks)
        .map(|bank| {
            let path = dir.join(format!("bank{bank}.csv"));
            fs::write(
                &path,
                generate_statement_csv(num_transactions, bank, num_banks, match_ratio),
            )?;
            Ok(path)
        })
        .collect::<std::io::Result<Vec<_>>>()?;

    Ok((ledger, statements))
}
