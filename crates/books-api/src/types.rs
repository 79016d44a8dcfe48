//! Rakuten Books API response types (formatVersion 2).
//!
//! These types represent the JSON responses from the books search
//! endpoint.

use serde::{Deserialize, Serialize};

/// A single book record from the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(rename = "publisherName", default)]
    pub publisher: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(rename = "salesDate", default)]
    pub sales_date: String,
    #[serde(rename = "itemUrl", default)]
    pub item_url: String,
}

/// Search endpoint response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct BooksResponse {
    #[serde(rename = "Items", default)]
    pub items: Vec<BookInfo>,
    #[serde(rename = "pageCount", default)]
    pub page_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_format_version_2_body() {
        let body = r#"{
            "Items": [
                {
                    "title": "ダンダダン 5",
                    "author": "龍幸伸",
                    "publisherName": "集英社",
                    "isbn": "9784088832387",
                    "salesDate": "2022年08月04日",
                    "itemUrl": "https://books.rakuten.co.jp/rb/17192186/",
                    "mediumImageUrl": "https://thumbnail.example/5.jpg"
                }
            ],
            "pageCount": 1
        }"#;

        let response: BooksResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.page_count, 1);
        assert_eq!(response.items.len(), 1);

        let book = &response.items[0];
        assert_eq!(book.title, "ダンダダン 5");
        assert_eq!(book.publisher, "集英社");
        assert_eq!(book.sales_date, "2022年08月04日");
        assert_eq!(book.item_url, "https://books.rakuten.co.jp/rb/17192186/");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let body = r#"{ "Items": [ { "title": "タイトル" } ] }"#;

        let response: BooksResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.page_count, 0);
        assert_eq!(response.items[0].author, "");
        assert_eq!(response.items[0].isbn, "");
    }
}
