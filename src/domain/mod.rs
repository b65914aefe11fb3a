pub mod summary;
pub mod video_id;
