use crate::configs::ConfigError;
use crate::item::{Author, Book, Member, NOT_AVAILABLE, UNKNOWN};
use crate::library::Library;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AuthorConfig {
    pub name: String,
    pub birth_year: i32,
}

impl Default for AuthorConfig {
    fn default() -> Self {
        Self {
            name: UNKNOWN.to_owned(),
            birth_year: 1900,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    pub title: String,
    pub author: AuthorConfig,
    pub year: i32,
    pub price: f64,
    pub isbn: String,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            title: UNKNOWN.to_owned(),
            author: AuthorConfig::default(),
            year: 1900,
            price: 0.0,
            isbn: NOT_AVAILABLE.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MemberConfig {
    pub name: String,
    pub id: String,
    pub year_joined: i32,
}

impl Default for MemberConfig {
    fn default() -> Self {
        Self {
            name: UNKNOWN.to_owned(),
            id: NOT_AVAILABLE.to_owned(),
            year_joined: 2025,
        }
    }
}

/// 도서관을 초기화할 때 사용할 도서, 회원 목록
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub books: Vec<BookConfig>,
    pub members: Vec<MemberConfig>,
}

impl CatalogConfig {
    /// 설정된 도서와 회원을 등록 순서대로 추가한 도서관을 만든다.
    /// 회원은 [`Library::add_member`]를 거치므로 아이디가 없는 회원은 제외된다.
    pub fn into_library(self) -> Library {
        let mut library = Library::new();
        for b in self.books {
            let author = Author::new(&b.author.name, b.author.birth_year);
            library.add_book(Book::new(&b.title, author, b.year, b.price, &b.isbn));
        }
        for m in self.members {
            library.add_member(Member::new(&m.name, &m.id, m.year_joined));
        }
        library
    }
}

/// 파일에서 카탈로그 설정을 읽는다. 파일 형식은 확장자로 판단한다.
pub fn load_catalog(path: &Path) -> Result<CatalogConfig, ConfigError> {
    info!("카탈로그 설정을 로드합니다. ({})", path.display());
    let config = config::Config::builder()
        .add_source(config::File::from(path))
        .build()?;

    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: CatalogConfig = serde_json::from_str(r#"{ "books": [{ "title": "Pod igoto" }] }"#).unwrap();
        assert_eq!(config.books[0].isbn, "N/A");
        assert_eq!(config.books[0].author, AuthorConfig::default());
        assert!(config.members.is_empty());
    }

    #[test]
    fn into_library_drops_invalid_members() {
        let config = CatalogConfig {
            books: vec![BookConfig::default()],
            members: vec![
                MemberConfig { name: "Petar Petrov".to_owned(), id: "M001".to_owned(), year_joined: 2023 },
                MemberConfig { id: String::new(), ..MemberConfig::default() },
            ],
        };

        let library = config.into_library();
        assert_eq!(library.total_books(), 1);
        assert_eq!(library.books()[0], Book::default());
        assert_eq!(library.total_members(), 1);
        assert_eq!(library.members()[0].id(), "M001");
    }
}
