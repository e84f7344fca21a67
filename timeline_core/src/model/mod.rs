pub mod metadata;
pub mod time;
pub mod timeline;
pub mod track;
