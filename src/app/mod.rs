pub mod handlers;
pub mod server;
pub mod static_files;

pub use server::{build_router, load_state, serve, AppInfo, AppState};
pub use static_files::StaticFiles;
