//! Collaborator traits implemented outside this crate.

pub mod storage;
