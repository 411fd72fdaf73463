pub mod modal_service;
pub mod ping_service;
pub mod render_service;
pub mod session_service;
pub mod sync_service;
pub mod table_service;
pub mod view_service;
