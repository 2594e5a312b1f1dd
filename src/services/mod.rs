pub mod cloudinary;
pub mod graph;
pub mod poll;
pub mod publish;
pub mod video;
