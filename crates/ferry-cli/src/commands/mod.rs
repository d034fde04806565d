pub mod check;
pub mod connections;
pub mod dedupe;
pub mod dispatch;
pub mod fix_content;
pub mod repair_media;
pub mod sanitize;
pub mod summary;
pub mod sync;
