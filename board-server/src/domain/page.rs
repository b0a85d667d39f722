use std::fmt;

use serde::Serialize;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortProperty {
    PostId,
    Title,
    Content,
}

impl SortProperty {
    pub fn column(self) -> &'static str {
        match self {
            SortProperty::PostId => "post_id",
            SortProperty::Title => "title",
            SortProperty::Content => "content",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "postId" => Some(SortProperty::PostId),
            "title" => Some(SortProperty::Title),
            "content" => Some(SortProperty::Content),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn keyword(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sort {
    pub property: SortProperty,
    pub direction: Direction,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            property: SortProperty::PostId,
            direction: Direction::Desc,
        }
    }
}

impl Sort {
    /// Parses `property[,asc|desc]`. A property given without a direction sorts ascending.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let mut parts = raw.split(',').map(str::trim);
        let property = parts
            .next()
            .and_then(SortProperty::parse)
            .ok_or_else(|| DomainError::InvalidRequest(format!("unknown sort property: {raw}")))?;

        let direction = match parts.next() {
            None | Some("") => Direction::Asc,
            Some(d) if d.eq_ignore_ascii_case("asc") => Direction::Asc,
            Some(d) if d.eq_ignore_ascii_case("desc") => Direction::Desc,
            Some(d) => {
                return Err(DomainError::InvalidRequest(format!(
                    "unknown sort direction: {d}"
                )));
            }
        };

        if parts.next().is_some() {
            return Err(DomainError::InvalidRequest(format!(
                "malformed sort parameter: {raw}"
            )));
        }

        Ok(Self {
            property,
            direction,
        })
    }

    /// SQL `ORDER BY` body. Non-unique columns fall back to the id so pages stay stable.
    pub fn order_by(&self) -> String {
        match self.property {
            SortProperty::PostId => format!("post_id {}", self.direction),
            other => format!("{} {}, post_id {}", other.column(), self.direction, self.direction),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Sort,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u32 = 5;
    pub const MAX_SIZE: u32 = 2000;

    pub fn new(page: u32, size: u32, sort: Sort) -> Self {
        let size = match size {
            0 => Self::DEFAULT_SIZE,
            s => s.min(Self::MAX_SIZE),
        };
        Self { page, size, sort }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_SIZE, Sort::default())
    }
}

/// One slice of a sorted result set plus the numbers needed to walk the rest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
    pub sort: Sort,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.size.max(1));
        let total_pages = total_elements.div_ceil(size);
        let number = request.page;

        Self {
            number_of_elements: content.len(),
            empty: content.is_empty(),
            content,
            number,
            size: request.size,
            total_elements,
            total_pages,
            first: number == 0,
            last: u64::from(number) + 1 >= total_pages,
            sort: request.sort,
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number_of_elements: self.number_of_elements,
            first: self.first,
            last: self.last,
            empty: self.empty,
            sort: self.sort,
        }
    }
}
