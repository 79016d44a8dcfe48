//! Announcement message formatting.

use crate::detector::NewRelease;

/// Posted once when the bot comes up.
pub const STARTUP_MESSAGE: &str = "📚 新刊チェックBotが起動しました！";

/// Text note announced for one new release
pub fn new_release_message(release: &NewRelease) -> String {
    format!(
        "📖 新刊情報！\n\n\
         {} Vol.{} が発売予定です！\n\
         📅 発売日: {}\n\
         👨‍🎨 作者: {}\n\
         🔗 {}",
        release.series_title,
        release.new_volume,
        release.sales_date,
        release.author,
        release.url
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_carries_release_details() {
        let release = NewRelease {
            series_title: "ダンダダン".to_string(),
            previous_volume: 3,
            new_volume: 4,
            author: "龍幸伸".to_string(),
            isbn: "9784088832387".to_string(),
            sales_date: "2024年06月04日".to_string(),
            url: "https://books.rakuten.co.jp/rb/17192186/".to_string(),
        };

        let message = new_release_message(&release);
        assert!(message.contains("ダンダダン Vol.4"));
        assert!(message.contains("2024年06月04日"));
        assert!(message.contains("龍幸伸"));
        assert!(message.contains("https://books.rakuten.co.jp/rb/17192186/"));
    }
}
