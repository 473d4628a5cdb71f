pub mod api;
pub mod api_doc;
pub mod server;
pub mod state;
pub mod store;

pub use server::run_server;
