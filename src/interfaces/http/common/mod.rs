//! Building blocks shared by every HTTP module

pub mod error;
pub mod extract;
pub mod response;
pub mod serde_helpers;
pub mod validated_json;

pub use error::{ApiError, ApiResult};
pub use extract::IdPath;
pub use response::ApiResponse;
pub use validated_json::ValidatedJson;
