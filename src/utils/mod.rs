//! Text helpers shared by translation engines

pub mod tags;

pub use tags::clean_spaces_around_tags;
