use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;
use tracing::debug;

/// 저자 출생 연도로 허용되는 범위
pub const BIRTH_YEAR_RANGE: RangeInclusive<i32> = 1850..=2025;

/// 도서 출판 연도로 허용되는 범위
pub const PUBLICATION_YEAR_RANGE: RangeInclusive<i32> = 1800..=2025;

/// 값이 지정되지 않았을 때 사용하는 기본 이름, 제목
pub const UNKNOWN: &str = "Unknown";

/// 값이 지정되지 않았을 때 사용하는 기본 ISBN, 회원 아이디
pub const NOT_AVAILABLE: &str = "N/A";

/// Item 모듈에서 사용할 에러 열거
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// 허용 범위를 벗어난 연도
    OutOfRange(String),

    /// 음수 혹은 숫자가 아닌 가격
    InvalidPrice(String),
}

impl Display for ItemError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for ItemError {}

/// 저자
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    name: String,
    birth_year: i32,
}

impl Author {
    /// 저자를 생성한다. 생성 시에는 출생 연도의 유효성을 검사하지 않는다.
    pub fn new(name: &str, birth_year: i32) -> Self {
        Self {
            name: name.to_owned(),
            birth_year,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_year(&self) -> i32 {
        self.birth_year
    }

    /// 출생 연도를 변경한다. [`BIRTH_YEAR_RANGE`]를 벗어나는 값은 무시된다.
    ///
    /// # Example
    /// ```
    /// use library_catalog::item::Author;
    ///
    /// let mut author = Author::new("Ivan Vazov", 1850);
    /// author.set_birth_year(1700);
    /// assert_eq!(author.birth_year(), 1850);
    ///
    /// author.set_birth_year(1851);
    /// assert_eq!(author.birth_year(), 1851);
    /// ```
    pub fn set_birth_year(&mut self, birth_year: i32) {
        _ = self.try_set_birth_year(birth_year);
    }

    /// [`Author::set_birth_year`]와 같지만 변경하지 못한 경우 에러를 반환한다.
    pub fn try_set_birth_year(&mut self, birth_year: i32) -> Result<(), ItemError> {
        if !BIRTH_YEAR_RANGE.contains(&birth_year) {
            debug!("허용 범위를 벗어난 출생 연도는 무시됩니다. ({}: {})", self.name, birth_year);
            return Err(ItemError::OutOfRange(format!("birth year: {}", birth_year)));
        }
        self.birth_year = birth_year;
        Ok(())
    }

    pub fn describe(&self) -> String {
        format!("{} ({})", self.name, self.birth_year)
    }
}

impl Default for Author {
    fn default() -> Self {
        Self::new(UNKNOWN, 1900)
    }
}

impl Display for Author {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// 도서
///
/// 저자 정보는 참조가 아닌 값으로 복사되어 도서가 소유한다.
/// ISBN은 도서를 식별하는 키로 사용되지만 중복 여부는 검사하지 않는다.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    title: String,
    author: Author,
    year: i32,
    price: f64,
    isbn: String,
}

impl Book {
    pub fn new(title: &str, author: Author, year: i32, price: f64, isbn: &str) -> Self {
        Self {
            title: title.to_owned(),
            author,
            year,
            price,
            isbn: isbn.to_owned(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    /// 출판 연도를 변경한다. [`PUBLICATION_YEAR_RANGE`]를 벗어나는 값은 무시된다.
    pub fn set_year(&mut self, year: i32) {
        _ = self.try_set_year(year);
    }

    pub fn try_set_year(&mut self, year: i32) -> Result<(), ItemError> {
        if !PUBLICATION_YEAR_RANGE.contains(&year) {
            debug!("허용 범위를 벗어난 출판 연도는 무시됩니다. (ISBN: {}, 연도: {})", self.isbn, year);
            return Err(ItemError::OutOfRange(format!("publication year: {}", year)));
        }
        self.year = year;
        Ok(())
    }

    /// 가격을 변경한다. 음수(그리고 NaN)는 무시된다.
    ///
    /// # Example
    /// ```
    /// use library_catalog::item::Book;
    ///
    /// let mut book = Book::default();
    /// book.set_price(-1.0);
    /// assert_eq!(book.price(), 0.0);
    ///
    /// book.set_price(18.9);
    /// assert_eq!(book.price(), 18.9);
    /// ```
    pub fn set_price(&mut self, price: f64) {
        _ = self.try_set_price(price);
    }

    pub fn try_set_price(&mut self, price: f64) -> Result<(), ItemError> {
        if !(price >= 0.0) {
            debug!("유효하지 않은 가격은 무시됩니다. (ISBN: {}, 가격: {})", self.isbn, price);
            return Err(ItemError::InvalidPrice(price.to_string()));
        }
        self.price = price;
        Ok(())
    }

    /// [`Book::describe`]와 열 너비가 맞는 헤더
    pub fn table_header() -> String {
        format!("{:<20}{:<22}{:<5}   {:<8}   {:<12}", "Title", "Author", "Year", "Price", "ISBN")
    }

    /// 도서 정보를 한 줄의 표 형식으로 반환한다.
    pub fn describe(&self) -> String {
        format!(
            "{:<20}{:<22}{:>5}   {:>8.2}   {:>12}",
            self.title,
            self.author.describe(),
            self.year,
            self.price,
            self.isbn
        )
    }
}

impl Default for Book {
    fn default() -> Self {
        Self::new(UNKNOWN, Author::default(), 1900, 0.0, NOT_AVAILABLE)
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// 도서관 회원
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    name: String,
    id: String,
    year_joined: i32,
}

impl Member {
    pub fn new(name: &str, id: &str, year_joined: i32) -> Self {
        Self {
            name: name.to_owned(),
            id: id.to_owned(),
            year_joined,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn year_joined(&self) -> i32 {
        self.year_joined
    }

    /// 회원 아이디가 비어있지 않은 경우에만 유효한 회원으로 취급한다.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn describe(&self) -> String {
        format!("{:<18}{:<8}Joined: {}", self.name, self.id, self.year_joined)
    }
}

impl Default for Member {
    fn default() -> Self {
        Self::new(UNKNOWN, NOT_AVAILABLE, 2025)
    }
}

impl Display for Member {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// 대출 기록
///
/// 날짜는 `YYYY-MM-DD` 형식의 문자열로 저장되며 파싱하지 않고 사전순으로만 비교한다.
/// 0으로 채워지지 않은 날짜가 들어오면 비교 결과가 올바르지 않을 수 있다.
///
/// # Example
/// ```
/// use library_catalog::item::Loan;
///
/// // 반납 예정일이 대출일보다 앞서면 대출일로 맞춰진다.
/// let loan = Loan::new("ISBN-001", "M001", "2025-11-03", "2025-11-01");
/// assert_eq!(loan.due_date(), "2025-11-03");
///
/// assert!(loan.is_overdue("2025-11-04"));
/// assert!(!loan.is_overdue("2025-11-03"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    isbn: String,
    member_id: String,
    start_date: String,
    due_date: String,
    returned: bool,
}

impl Loan {
    pub fn new(isbn: &str, member_id: &str, start_date: &str, due_date: &str) -> Self {
        let due_date = if due_date < start_date { start_date } else { due_date };

        Self {
            isbn: isbn.to_owned(),
            member_id: member_id.to_owned(),
            start_date: start_date.to_owned(),
            due_date: due_date.to_owned(),
            returned: false,
        }
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn member_id(&self) -> &str {
        &self.member_id
    }

    pub fn start_date(&self) -> &str {
        &self.start_date
    }

    pub fn due_date(&self) -> &str {
        &self.due_date
    }

    pub fn is_returned(&self) -> bool {
        self.returned
    }

    /// 반납 처리한다. 한번 반납된 대출은 다시 대출 상태로 돌아가지 않는다.
    pub fn mark_returned(&mut self) {
        self.returned = true;
    }

    pub fn is_overdue(&self, today: &str) -> bool {
        !self.returned && self.due_date.as_str() < today
    }

    pub fn describe(&self) -> String {
        format!(
            "ISBN: {:<11} | Member: {:<6} | {} - {}{}",
            self.isbn,
            self.member_id,
            self.start_date,
            self.due_date,
            if self.returned { " [returned]" } else { " [active]" }
        )
    }
}

impl Display for Loan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
