// Endpoint wrappers
// One thin function per backend endpoint; no retained state, no schemas

pub mod community;
pub mod ingredient;
pub mod nutrition;
pub mod recipe;
pub mod shopping;
pub mod user;
