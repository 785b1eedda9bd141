//! HTTP middleware

mod request_tracking;

pub use request_tracking::{
    request_id_layer, request_id_propagation_layer, sensitive_headers, sensitive_headers_layer,
    REQUEST_ID_HEADER,
};
