use crate::item::{Book, Loan, Member};
use serde::Serialize;
use std::fmt;
use std::fmt::{Display, Formatter};
use tracing::{debug, info, warn};

/// 대출/반납 처리 실패 사유
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoanError {
    /// 카탈로그에 등록되지 않은 ISBN
    UnknownBook(String),

    /// 이미 반납 되지 않은 대출이 있는 ISBN
    AlreadyLoaned(String),

    /// ISBN, 회원 아이디와 일치하는 진행 중인 대출이 없음
    NoActiveLoan { isbn: String, member_id: String },
}

impl Display for LoanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LoanError::UnknownBook(isbn) => write!(f, "Unknown book, {}", isbn),
            LoanError::AlreadyLoaned(isbn) => write!(f, "Already loaned, {}", isbn),
            LoanError::NoActiveLoan { isbn, member_id } => {
                write!(f, "No active loan, {} / {}", isbn, member_id)
            }
        }
    }
}

impl std::error::Error for LoanError {}

/// 도서관 현황 요약
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LibrarySummary {
    pub books: usize,
    pub members: usize,
    pub active_loans: usize,
}

impl Display for LibrarySummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Library Summary:")?;
        writeln!(f, "  Books:        {}", self.books)?;
        writeln!(f, "  Members:      {}", self.members)?;
        writeln!(f, "  Active loans: {}", self.active_loans)
    }
}

/// 도서, 회원, 대출 기록을 소유하는 도서관
///
/// 세 컬렉션 모두 등록 순서를 유지하며 별도의 색인은 두지 않는다.
/// 도서의 대출 가능 여부는 저장하지 않고 대출 기록을 조회하여 계산하며,
/// ISBN 당 반납 되지 않은 대출은 최대 하나만 존재하도록 [`Library::loan_book`]에서 보장한다.
///
/// 내부 동기화가 없으므로 여러 스레드에서 사용할 경우 호출자가 접근을 직렬화 해야 한다.
///
/// # Example
/// ```
/// use library_catalog::item::{Author, Book, Member};
/// use library_catalog::library::Library;
///
/// let mut library = Library::new();
/// let vazov = Author::new("Ivan Vazov", 1850);
/// library.add_book(Book::new("Pod igoto", vazov.clone(), 1894, 25.50, "ISBN-001"));
/// library.add_book(Book::new("Nema zemya", vazov, 1900, 18.90, "ISBN-002"));
/// library.add_member(Member::new("Petar Petrov", "M001", 2023));
///
/// assert!(library.loan_book("ISBN-001", "M001", "2025-11-03", "2025-11-17"));
/// assert!(!library.is_book_available("ISBN-001"));
/// assert!(!library.loan_book("ISBN-001", "M001", "2025-11-03", "2025-11-17"));
///
/// assert!(library.return_book("ISBN-001", "M001"));
/// assert!(library.is_book_available("ISBN-001"));
///
/// let titles: Vec<&str> = library.find_by_author("Vazov").iter().map(|b| b.title()).collect();
/// assert_eq!(titles, vec!["Pod igoto", "Nema zemya"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Library {
    books: Vec<Book>,
    members: Vec<Member>,
    loans: Vec<Loan>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    /// 도서를 등록한다. 중복 ISBN 여부는 검사하지 않는다.
    pub fn add_book(&mut self, book: Book) {
        debug!("도서를 등록합니다. (ISBN: {}, 제목: {})", book.isbn(), book.title());
        self.books.push(book);
    }

    /// 회원을 등록한다. 아이디가 비어있는 회원은 에러 없이 무시된다.
    pub fn add_member(&mut self, member: Member) {
        if !member.is_valid() {
            warn!("아이디가 없는 회원은 등록 되지 않습니다. (이름: {})", member.name());
            return;
        }
        debug!("회원을 등록합니다. (아이디: {})", member.id());
        self.members.push(member);
    }

    pub fn has_book(&self, isbn: &str) -> bool {
        self.books.iter().any(|b| b.isbn() == isbn)
    }

    /// 해당 ISBN으로 반납 되지 않은 대출이 없으면 대출 가능하다.
    ///
    /// 카탈로그에 없는 ISBN도 대출 가능으로 판단하므로 등록 여부는 [`Library::has_book`]으로 따로 확인해야 한다.
    pub fn is_book_available(&self, isbn: &str) -> bool {
        !self.loans.iter().any(|l| l.isbn() == isbn && !l.is_returned())
    }

    /// 도서를 대출한다. 등록된 도서이고 대출 중이 아닐 때만 대출 기록을 추가하고 `true`를 반환한다.
    ///
    /// 회원 아이디가 등록된 회원인지는 검사하지 않는다.
    pub fn loan_book(&mut self, isbn: &str, member_id: &str, start: &str, due: &str) -> bool {
        self.try_loan_book(isbn, member_id, start, due).is_ok()
    }

    /// [`Library::loan_book`]과 같지만 실패 사유를 반환한다.
    pub fn try_loan_book(&mut self, isbn: &str, member_id: &str, start: &str, due: &str) -> Result<(), LoanError> {
        if !self.has_book(isbn) {
            debug!("등록 되지 않은 도서는 대출할 수 없습니다. (ISBN: {})", isbn);
            return Err(LoanError::UnknownBook(isbn.to_owned()));
        }
        if !self.is_book_available(isbn) {
            debug!("이미 대출 중인 도서 입니다. (ISBN: {})", isbn);
            return Err(LoanError::AlreadyLoaned(isbn.to_owned()));
        }

        let loan = Loan::new(isbn, member_id, start, due);
        info!("대출 처리 되었습니다. (ISBN: {}, 회원: {}, 반납 예정일: {})", isbn, member_id, loan.due_date());
        self.loans.push(loan);
        Ok(())
    }

    /// 회원의 진행 중인 대출 중 가장 먼저 등록된 대출을 반납 처리한다.
    pub fn return_book(&mut self, isbn: &str, member_id: &str) -> bool {
        self.try_return_book(isbn, member_id).is_ok()
    }

    pub fn try_return_book(&mut self, isbn: &str, member_id: &str) -> Result<(), LoanError> {
        let loan = self.loans.iter_mut()
            .find(|l| l.isbn() == isbn && l.member_id() == member_id && !l.is_returned());

        match loan {
            Some(loan) => {
                loan.mark_returned();
                info!("반납 처리 되었습니다. (ISBN: {}, 회원: {})", isbn, member_id);
                Ok(())
            }
            None => {
                debug!("반납할 대출이 없습니다. (ISBN: {}, 회원: {})", isbn, member_id);
                Err(LoanError::NoActiveLoan {
                    isbn: isbn.to_owned(),
                    member_id: member_id.to_owned(),
                })
            }
        }
    }

    /// 저자 이름에 `name`이 포함된 도서를 등록 순서대로 찾는다. 대소문자를 구분한다.
    pub fn find_by_author(&self, name: &str) -> Vec<&Book> {
        self.books.iter()
            .filter(|b| b.author().name().contains(name))
            .collect()
    }

    pub fn active_loans(&self) -> impl Iterator<Item = &Loan> {
        self.loans.iter().filter(|l| !l.is_returned())
    }

    /// `today` 기준으로 반납 예정일이 지난 진행 중인 대출
    pub fn overdue_loans<'a>(&'a self, today: &'a str) -> impl Iterator<Item = &'a Loan> {
        self.loans.iter().filter(move |l| l.is_overdue(today))
    }

    pub fn total_books(&self) -> usize {
        self.books.len()
    }

    pub fn total_members(&self) -> usize {
        self.members.len()
    }

    pub fn active_loan_count(&self) -> usize {
        self.active_loans().count()
    }

    pub fn summary(&self) -> LibrarySummary {
        LibrarySummary {
            books: self.total_books(),
            members: self.total_members(),
            active_loans: self.active_loan_count(),
        }
    }
}

impl Display for Library {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Author;

    fn vazov_library() -> Library {
        let mut library = Library::new();
        let vazov = Author::new("Ivan Vazov", 1850);
        library.add_book(Book::new("Pod igoto", vazov.clone(), 1894, 25.50, "ISBN-001"));
        library.add_book(Book::new("Nema zemya", vazov, 1900, 18.90, "ISBN-002"));
        library.add_member(Member::new("Petar Petrov", "M001", 2023));
        library
    }

    #[test]
    fn add_member_drops_empty_id() {
        let mut library = Library::new();
        library.add_member(Member::new("Nobody", "", 2020));
        library.add_member(Member::new("Petar Petrov", "M001", 2023));

        assert_eq!(library.total_members(), 1);
        assert!(library.members().iter().all(|m| !m.id().is_empty()));
    }

    #[test]
    fn add_book_does_not_deduplicate() {
        let mut library = Library::new();
        library.add_book(Book::default());
        library.add_book(Book::default());
        assert_eq!(library.total_books(), 2);
    }

    #[test]
    fn unknown_isbn_is_vacuously_available() {
        let library = vazov_library();
        assert!(!library.has_book("ISBN-404"));
        assert!(library.is_book_available("ISBN-404"));
    }

    #[test]
    fn loan_of_unknown_book_changes_nothing() {
        let mut library = vazov_library();
        assert!(!library.loan_book("ISBN-404", "M001", "2025-11-03", "2025-11-17"));
        assert_eq!(
            library.try_loan_book("ISBN-404", "M001", "2025-11-03", "2025-11-17"),
            Err(LoanError::UnknownBook("ISBN-404".to_owned()))
        );
        assert!(library.loans().is_empty());
    }

    #[test]
    fn second_loan_fails_until_returned() {
        let mut library = vazov_library();
        assert!(library.loan_book("ISBN-001", "M001", "2025-11-03", "2025-11-17"));
        assert_eq!(
            library.try_loan_book("ISBN-001", "M002", "2025-11-04", "2025-11-18"),
            Err(LoanError::AlreadyLoaned("ISBN-001".to_owned()))
        );
        assert_eq!(library.loans().len(), 1);

        assert!(library.return_book("ISBN-001", "M001"));
        assert!(library.loan_book("ISBN-001", "M002", "2025-11-20", "2025-12-04"));
        assert_eq!(library.loans().len(), 2);
        assert_eq!(library.active_loan_count(), 1);
    }

    #[test]
    fn loan_does_not_require_registered_member() {
        let mut library = vazov_library();
        assert!(library.loan_book("ISBN-002", "M999", "2025-11-03", "2025-11-17"));
        assert_eq!(library.loans()[0].member_id(), "M999");
    }

    #[test]
    fn return_succeeds_once_per_active_loan() {
        let mut library = vazov_library();
        library.loan_book("ISBN-001", "M001", "2025-11-03", "2025-11-17");

        assert!(!library.return_book("ISBN-001", "M002"));
        assert!(library.return_book("ISBN-001", "M001"));
        assert!(!library.return_book("ISBN-001", "M001"));
        assert_eq!(
            library.try_return_book("ISBN-001", "M001"),
            Err(LoanError::NoActiveLoan { isbn: "ISBN-001".to_owned(), member_id: "M001".to_owned() })
        );
        assert!(library.loans()[0].is_returned());
    }

    #[test]
    fn loan_clamps_due_date_to_start() {
        let mut library = vazov_library();
        library.loan_book("ISBN-001", "M001", "2025-11-03", "2025-10-01");
        assert_eq!(library.loans()[0].due_date(), "2025-11-03");
    }

    #[test]
    fn find_by_author_is_case_sensitive_and_ordered() {
        let mut library = vazov_library();
        library.add_book(Book::new("Tobacco", Author::new("Dimitar Dimov", 1909), 1951, 30.0, "ISBN-003"));
        library.add_book(Book::new("Chichovtsi", Author::new("Ivan Vazov", 1850), 1885, 12.0, "ISBN-004"));

        let isbn: Vec<&str> = library.find_by_author("Vazov").iter().map(|b| b.isbn()).collect();
        assert_eq!(isbn, vec!["ISBN-001", "ISBN-002", "ISBN-004"]);
        assert!(library.find_by_author("vazov").is_empty());
        assert_eq!(library.find_by_author("").len(), 4);
    }

    #[test]
    fn overdue_loans_only_include_unreturned_past_due() {
        let mut library = vazov_library();
        library.loan_book("ISBN-001", "M001", "2025-11-03", "2025-11-17");
        library.loan_book("ISBN-002", "M001", "2025-11-03", "2025-12-17");

        let overdue: Vec<&str> = library.overdue_loans("2025-11-20").map(|l| l.isbn()).collect();
        assert_eq!(overdue, vec!["ISBN-001"]);

        library.return_book("ISBN-001", "M001");
        assert_eq!(library.overdue_loans("2025-11-20").count(), 0);
    }

    #[test]
    fn summary_counts_active_loans() {
        let mut library = vazov_library();
        library.loan_book("ISBN-001", "M001", "2025-11-03", "2025-11-17");
        library.loan_book("ISBN-002", "M001", "2025-11-03", "2025-11-17");
        library.return_book("ISBN-002", "M001");

        let summary = library.summary();
        assert_eq!(summary, LibrarySummary { books: 2, members: 1, active_loans: 1 });
        assert_eq!(
            library.to_string(),
            "Library Summary:\n  Books:        2\n  Members:      1\n  Active loans: 1\n"
        );
    }
}
