pub mod batch;
pub mod classify;
pub mod context;
pub mod dispatch;
pub mod label;
pub mod schema;
pub mod shared;
pub mod strip;
