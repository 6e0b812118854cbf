pub mod http;
pub mod session_file;
pub mod wire;

pub use http::HttpBackend;
pub use session_file::FileSessionStore;
