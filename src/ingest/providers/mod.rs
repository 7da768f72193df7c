pub mod google_trends;
pub mod news_rss;
pub mod reddit;
