use clap::Parser;
use library_catalog::configs;
use library_catalog::configs::catalog;
use library_catalog::item::{Author, Book, Member};
use library_catalog::library::Library;
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// 도서관 카탈로그를 구성하고 대출/반납 시나리오를 실행한다.
#[derive(Debug, Parser)]
#[command(name = "library-catalog", version)]
struct Argument {
    /// 초기 도서, 회원 목록 파일 (지정하지 않으면 예제 카탈로그를 사용)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// 연체 여부를 판단할 기준 날짜 (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    today: Option<String>,

    /// 요약 정보를 JSON으로 출력
    #[arg(long)]
    json: bool,
}

fn parse_date(s: &str) -> Result<String, String> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|e| format!("Invalid date: {}", e))
}

fn main() -> ExitCode {
    configs::load_dotenv();
    let _guard = match configs::set_global_logging_config() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let args = Argument::parse();
    let library = match &args.catalog {
        Some(path) => match catalog::load_catalog(path) {
            Ok(config) => config.into_library(),
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => demo_library(),
    };

    let today = args.today
        .unwrap_or_else(|| chrono::Local::now().date_naive().format("%Y-%m-%d").to_string());

    let stdout = std::io::stdout();
    match run(&mut stdout.lock(), library, &today, args.json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn demo_library() -> Library {
    let mut library = Library::new();
    let vazov = Author::new("Ivan Vazov", 1850);
    library.add_book(Book::new("Pod igoto", vazov.clone(), 1894, 25.50, "ISBN-001"));
    library.add_book(Book::new("Nema zemya", vazov, 1900, 18.90, "ISBN-002"));
    library.add_member(Member::new("Petar Petrov", "M001", 2023));
    library
}

fn run<W: Write>(out: &mut W, mut library: Library, today: &str, json: bool) -> Result<(), Box<dyn Error>> {
    writeln!(out, "===== Library =====")?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&library.summary())?)?;
    } else {
        writeln!(out, "{}", library)?;
    }

    writeln!(out, "Members:")?;
    for m in library.members() {
        writeln!(out, "{}", m)?;
    }

    writeln!(out, "\nBooks:")?;
    writeln!(out, "{}", Book::table_header())?;
    for b in library.books() {
        writeln!(out, "{}", b)?;
    }

    writeln!(out, "\nCreating loan for ISBN-001...")?;
    match library.try_loan_book("ISBN-001", "M001", "2025-11-03", "2025-11-17") {
        Ok(()) => writeln!(out, "Loan created.")?,
        Err(e) => writeln!(out, "Loan failed. ({})", e)?,
    }

    writeln!(out, "\nActive loans:")?;
    for l in library.active_loans() {
        writeln!(out, "{}", l)?;
    }

    writeln!(out, "\nAvailability check for ISBN-001:")?;
    writeln!(out, "{}", if library.is_book_available("ISBN-001") { "Available" } else { "Not available" })?;

    writeln!(out, "\nOverdue loans as of {}:", today)?;
    for l in library.overdue_loans(today) {
        writeln!(out, "{}", l)?;
    }

    writeln!(out, "\nReturning ISBN-001...")?;
    match library.try_return_book("ISBN-001", "M001") {
        Ok(()) => writeln!(out, "Returned successfully")?,
        Err(e) => writeln!(out, "Return failed. ({})", e)?,
    }

    writeln!(out, "\nBooks by author containing 'Vazov':")?;
    for b in library.find_by_author("Vazov") {
        writeln!(out, "{}", b)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_string(library: Library, json: bool) -> String {
        let mut out = Vec::new();
        run(&mut out, library, "2025-11-20", json).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn demo_scenario_loans_and_returns() {
        let output = run_to_string(demo_library(), false);
        assert!(output.contains("Loan created."));
        assert!(output.contains("Not available"));
        assert!(output.contains("Returned successfully"));
        assert!(output.contains("Overdue loans as of 2025-11-20:\nISBN: ISBN-001"));
    }

    #[test]
    fn return_fails_when_book_was_never_loaned() {
        let mut library = Library::new();
        library.add_book(Book::new("X", Author::default(), 1900, 0.0, "X"));

        let output = run_to_string(library, false);
        assert!(output.contains("Loan failed. (Unknown book, ISBN-001)"));
        assert!(output.contains("Return failed. (No active loan, ISBN-001 / M001)"));
        assert!(!output.contains("Returned successfully"));
    }

    #[test]
    fn json_summary_is_parseable() {
        let output = run_to_string(demo_library(), true);
        let summary = output
            .split_once("===== Library =====\n").unwrap().1
            .split_once("\nMembers:").unwrap().0;

        let value: serde_json::Value = serde_json::from_str(summary).unwrap();
        assert_eq!(value["books"], 2);
        assert_eq!(value["members"], 1);
        assert_eq!(value["active_loans"], 0);
    }
}
