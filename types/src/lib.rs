//! Common types shared by the crapshoot engine and its front-ends.

pub mod casino;
