pub mod facebook;
pub mod gdrive;
pub mod github;
pub mod instagram;
pub mod mediafire;
pub mod pinterest;
pub mod search;
pub mod tiktok;
pub mod twitter;
pub mod youtube;
