use roundtrip::ledger::{read_ledger, SENTINEL_DATE};
use roundtrip::{CsvLedger, ExecutionError, ExecutionSource, LedgerError, Side};
use std::io::Write;

const HEADER: &str = "DateTime,Symbol,Action,Number of Shares,Price,Commissions\n";

fn write_ledger(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_reads_ledger_file_in_order() {
    let file = write_ledger(&format!(
        "{}\
         3/12/2014 9:31:05 AM,AAPL,BOT,100,530.25,1.00\n\
         3/12/2014 9:33:00 AM,MSFT,SLD,200,38.10,1.00\n\
         09:45:10,AAPL,SLD,100,531.00,1.00\n\
         ,,,,,\n",
        HEADER
    ));

    let executions = CsvLedger::new(file.path()).load_executions().unwrap();

    assert_eq!(executions.len(), 3);
    assert_eq!(executions[0].symbol.as_str(), "AAPL");
    assert_eq!(executions[1].symbol.as_str(), "MSFT");
    assert_eq!(executions[1].side, Side::Sell);
    assert_eq!(executions[2].timestamp.date(), SENTINEL_DATE);
}

#[test]
fn test_header_whitespace_tolerated() {
    let file = write_ledger(
        " DateTime , Symbol , Action , Number of Shares , Price , Commissions \n\
         2014-03-12 09:31:05 , AAPL , bot , 10 , 5.5 , 0.35 \n",
    );

    let executions = read_ledger(file.path()).unwrap();
    assert_eq!(executions.len(), 1);
    assert_eq!(executions[0].side, Side::Buy);
    assert_eq!(executions[0].commission, 0.35);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_ledger(dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, LedgerError::Io(_)));
    assert_eq!(err.row(), None);
}

#[test]
fn test_malformed_row_rejects_whole_ledger() {
    let file = write_ledger(&format!(
        "{}\
         2014-03-12 09:31:05,AAPL,BOT,100,10,1\n\
         2014-03-12 09:32:05,AAPL,SLD,100,-10,1\n",
        HEADER
    ));

    let err = read_ledger(file.path()).unwrap_err();
    match err {
        LedgerError::MalformedRow { row, source } => {
            assert_eq!(row, 2);
            assert_eq!(source, ExecutionError::NonPositivePrice(-10.0));
        }
        other => panic!("Expected MalformedRow, got {:?}", other),
    }
}

#[test]
fn test_negative_commission_rejected() {
    let file = write_ledger(&format!("{}2014-03-12 09:31:05,AAPL,BOT,100,10,-1\n", HEADER));
    let err = read_ledger(file.path()).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::MalformedRow {
            source: ExecutionError::NegativeCommission(_),
            ..
        }
    ));
}

#[test]
fn test_error_messages_name_the_row() {
    let file = write_ledger(&format!("{}someday,AAPL,BOT,100,10,1\n", HEADER));
    let err = read_ledger(file.path()).unwrap_err();
    assert_eq!(err.to_string(), "row 1: unparseable timestamp \"someday\"");
}
