mod authenticate;
mod documents;
mod health;
mod inference;

use serde::Serialize;

pub use authenticate::authenticate_handler;
pub use documents::{
    download_document_handler, search_documents_get_handler, search_documents_post_handler,
};
pub use health::health_handler;
pub use inference::{
    inference_query_handler, inference_search_get_handler, inference_search_post_handler,
};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
