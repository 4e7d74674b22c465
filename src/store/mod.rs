// Document store plumbing shared by the service and booking repositories
pub use acks::{DeleteAck, InsertAck, UpdateAck};
pub use client::connect;
pub use query::{compare_json, parse_object_id, ServiceQuery, SortOrder, SortSpec};

mod acks;
mod client;
mod query;
