pub mod json_api;

pub use json_api::{
    evaluate_batch_json, evaluate_batch_json_with_config, evaluate_site_json,
    evaluate_site_json_with_config, request_digest, request_schema_json, BatchEntry,
    ErrorResponse, SiteResponse,
};
