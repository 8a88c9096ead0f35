pub mod page;
pub mod server;
pub mod types;

pub use server::{
    router,
    serve,
    serve_on,
};
pub use types::UploadResponse;
